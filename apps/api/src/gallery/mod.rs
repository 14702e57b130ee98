// Template & sample gallery.
// Static catalog: template cards map to a layout recommendation; samples are raw resume
// JSON loaded through the normal ingestion path.

pub mod handlers;

use serde::Serialize;
use serde_json::{json, Value};

use crate::editor::design::{Layout, Recommendation};

#[derive(Debug, Clone, Serialize)]
pub struct TemplateCard {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub features: [&'static str; 3],
}

impl TemplateCard {
    /// The gallery id goes through the layout alias table, so it always resolves.
    pub fn recommendation(&self) -> Recommendation {
        Recommendation {
            layout: self.id.to_string(),
            color: self.color.to_string(),
            title: Some(self.name.to_string()),
        }
    }

    pub fn layout(&self) -> Layout {
        Layout::resolve(self.id)
    }
}

pub static TEMPLATES: [TemplateCard; 3] = [
    TemplateCard {
        id: "beam",
        name: "Beam",
        description: "Clean and professional for corporate roles.",
        color: "#fca5a5",
        features: ["Clean Layout", "Professional", "ATS Friendly"],
    },
    TemplateCard {
        id: "elegant",
        name: "Elegant",
        description: "Stand out with a bold and unique design.",
        color: "#1e293b",
        features: ["Unique Design", "Bold Colors", "Portfolio Focus"],
    },
    TemplateCard {
        id: "smart",
        name: "Smart",
        description: "Minimalist design that focuses on content.",
        color: "#3b82f6",
        features: ["Minimalist", "Easy to Read", "Classic Style"],
    },
];

pub fn find_template(id: &str) -> Option<&'static TemplateCard> {
    TEMPLATES.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

// ────────────────────────────────────────────────────────────────────────────
// Samples
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SampleSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub layout: Layout,
    pub color: &'static str,
}

pub struct Sample {
    pub summary: SampleSummary,
    /// Raw resume JSON, deliberately in the loose shape an upload produces.
    pub data: fn() -> Value,
}

impl Sample {
    pub fn recommendation(&self) -> Recommendation {
        Recommendation {
            layout: self.summary.layout.as_str().to_string(),
            color: self.summary.color.to_string(),
            title: Some(self.summary.title.to_string()),
        }
    }
}

pub static SAMPLES: [Sample; 3] = [
    Sample {
        summary: SampleSummary {
            id: "senior-product-manager",
            title: "Executive",
            category: "Business",
            description: "For senior leaders and managers.",
            layout: Layout::Modern,
            color: "#374151",
        },
        data: senior_product_manager,
    },
    Sample {
        summary: SampleSummary {
            id: "student-researcher",
            title: "Academic CV",
            category: "Student",
            description: "Structured for researchers and scholars.",
            layout: Layout::Classic,
            color: "#fca5a5",
        },
        data: student_researcher,
    },
    Sample {
        summary: SampleSummary {
            id: "data-scientist",
            title: "Technical",
            category: "Engineering",
            description: "For developers and engineers.",
            layout: Layout::Elegant,
            color: "#0f766e",
        },
        data: data_scientist,
    },
];

pub fn find_sample(id: &str) -> Option<&'static Sample> {
    SAMPLES.iter().find(|s| s.summary.id == id)
}

fn senior_product_manager() -> Value {
    json!({
        "fullName": "Jordan Alex",
        "email": "jordan.alex@example.com",
        "phone": "(555) 123-4567",
        "location": "San Francisco, CA",
        "linkedin": "linkedin.com/in/jordanalex",
        "summary": "Strategic Senior Product Manager with 10+ years driving product vision, cross-functional leadership, and market-focused growth. Proven track record of launching high-impact SaaS solutions that increase revenue and user engagement.",
        "experience": [
            {
                "id": 1,
                "title": "Senior Product Manager",
                "company": "TechNova Solutions",
                "date": "Jan 2020 – Present",
                "location": "San Francisco, CA",
                "description": "• Increased annual recurring revenue by 30% through new pricing strategy and feature rollouts.\n• Led a cross-functional team of 12 to launch an AI-driven analytics platform, reaching 150k active users within 6 months.\n• Reduced churn by 18% by implementing customer feedback loops and a better onboarding experience."
            },
            {
                "id": 2,
                "title": "Product Manager",
                "company": "Innovatech Corp",
                "date": "May 2015 – Dec 2019",
                "location": "Seattle, WA",
                "description": "• Delivered three major product releases, contributing to a 25% increase in market share.\n• Cut time-to-market by 20% through agile processes.\n• Managed a $2M product budget and prioritized features based on ROI analysis."
            },
            {
                "id": 3,
                "title": "Associate Product Manager",
                "company": "StartUp Labs",
                "date": "Jun 2012 – Apr 2015",
                "location": "Austin, TX",
                "description": "• Managed MVP development that secured $2M seed funding.\n• Implemented a user testing framework, increasing satisfaction scores by 15%."
            }
        ],
        "education": [
            {
                "id": 1,
                "degree": "MBA, Technology Management",
                "school": "University of California, Berkeley",
                "date": "2012",
                "location": "Berkeley, CA"
            },
            {
                "id": 2,
                "degree": "Bachelor of Science in Computer Science",
                "school": "Stanford University",
                "date": "2009",
                "location": "Stanford, CA"
            }
        ],
        "skills": [
            "Product Strategy", "Agile & Scrum", "Data Analysis", "User Research",
            "Roadmapping", "Stakeholder Management", "A/B Testing", "SQL & Tableau"
        ]
    })
}

fn student_researcher() -> Value {
    json!({
        "fullName": "Jake Ryan",
        "email": "jake@su.edu",
        "phone": "123-456-7890",
        "location": "",
        "linkedin": "linkedin.com/in/jake | github.com/jake",
        "summary": "",
        "experience": [
            {
                "id": 1,
                "title": "Undergraduate Research Assistant",
                "company": "Texas A&M University",
                "date": "June 2020 - Present",
                "location": "College Station, TX",
                "description": [
                    "• Developed a REST API using FastAPI and PostgreSQL to store data from learning management systems",
                    "• Explored ways to visualize GitHub collaboration in a classroom setting"
                ]
            },
            {
                "id": 2,
                "title": "Information Technology Support Specialist",
                "company": "Southwestern University",
                "date": "Sep. 2018 - Present",
                "location": "Georgetown, TX",
                "description": "• Assess and troubleshoot computer problems brought by students, faculty and staff\n• Maintain upkeep of computers, classroom equipment, and 200 printers across campus"
            }
        ],
        "education": [
            {
                "id": 1,
                "degree": "Bachelor of Arts in Computer Science, Minor in Business",
                "school": "Southwestern University",
                "date": "Aug. 2018 - May 2021",
                "location": "Georgetown, TX"
            }
        ],
        "skills": [
            "Languages: Java, Python, C/C++, SQL (Postgres), JavaScript, HTML/CSS, R",
            "Frameworks: React, Node.js, Flask, JUnit, FastAPI",
            "Developer Tools: Git, Docker, Google Cloud Platform, VS Code"
        ],
        "projects": [
            {
                "id": 1,
                "title": "Gitlytics | Python, Flask, React, PostgreSQL, Docker",
                "company": "",
                "date": "June 2020 - Present",
                "description": "• Developed a full-stack web application with Flask serving a REST API and React as the frontend"
            }
        ]
    })
}

fn data_scientist() -> Value {
    json!({
        "fullName": "Priya Raman",
        "email": "priya.raman@example.com",
        "phone": "+91 98765 43210",
        "location": "Gurgaon, India",
        "linkedin": "linkedin.com/in/priyaraman",
        "summary": "Data Scientist specializing in machine learning, deep learning and retrieval-augmented generation. Skilled in Python, PyTorch, LangChain, FastAPI and AWS, with a strong foundation in mathematics and statistics.",
        "experience": [
            {
                "id": 1,
                "title": "Data Science / Machine Learning Intern",
                "company": "InternsElite Pvt. Ltd.",
                "date": "Aug 2024 - Jan 2025",
                "location": "Gurgaon, India",
                "description": "• Built end-to-end ML pipelines for classification and regression using Pandas, NumPy and Scikit-learn.\n\n• Implemented CNN architectures for image classification with augmentation and transfer learning.\n• Deployed models behind FastAPI endpoints and tracked experiments with MLflow."
            }
        ],
        "education": [
            {
                "id": 1,
                "degree": "Master of Science in Data Science",
                "school": "Indian Institute of Information Technology Lucknow",
                "date": "Aug 2024 – June 2026",
                "location": "8.34 CGPA"
            },
            {
                "id": 2,
                "degree": "Bachelor of Science (Mathematics & Statistics)",
                "school": "Osmania University",
                "date": "Aug 2022 – June 2024",
                "location": "Hyderabad, India"
            }
        ],
        "skills": [
            "Python", "PyTorch", "TensorFlow", "Scikit-learn", "LangChain",
            "FastAPI", "Docker", "AWS", "SQL", 2024
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::design::DesignConfiguration;
    use crate::editor::ingest::normalize;

    #[test]
    fn test_gallery_templates_resolve_to_layouts() {
        assert_eq!(find_template("beam").unwrap().layout(), Layout::Classic);
        assert_eq!(find_template("elegant").unwrap().layout(), Layout::Elegant);
        assert_eq!(find_template("SMART").unwrap().layout(), Layout::Modern);
        assert!(find_template("nope").is_none());
    }

    #[test]
    fn test_template_recommendation_applies_layout_and_color() {
        let mut design = DesignConfiguration::default();
        design.apply_recommendation(&find_template("beam").unwrap().recommendation());
        assert_eq!(design.template, Layout::Classic);
        assert_eq!(design.color, "#fca5a5");
    }

    #[test]
    fn test_every_sample_normalizes() {
        for sample in &SAMPLES {
            let (doc, _) = normalize(&(sample.data)());
            assert!(!doc.full_name.is_empty(), "{} has a name", sample.summary.id);
            assert!(!doc.experience.is_empty());
            assert!(!doc.skills.is_empty());
        }
    }

    #[test]
    fn test_student_sample_joins_description_array() {
        let (doc, _) = normalize(&(find_sample("student-researcher").unwrap().data)());
        assert_eq!(doc.experience[0].description.lines().count(), 2);
        assert_eq!(doc.projects.len(), 1);
    }

    #[test]
    fn test_data_scientist_sample_stringifies_numeric_skill() {
        let (doc, report) = normalize(&(find_sample("data-scientist").unwrap().data)());
        assert_eq!(doc.skills.last().map(String::as_str), Some("2024"));
        assert_eq!(report.dropped_skills, 0);
    }
}
