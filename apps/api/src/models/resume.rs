use serde::{Deserialize, Serialize};

/// Identifier of one entry inside a repeatable section.
/// Unique among its siblings; never reassigned on edit.
pub type EntryId = u64;

/// The canonical structured content of one resume.
///
/// Every field is always present. Inbound partial data goes through
/// `editor::ingest::normalize` before it ever becomes a `ResumeDocument`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: EntryId,
    pub title: String,
    pub company: String,
    pub date: String,
    pub location: String,
    pub description: String,
}

/// Projects share the experience shape (title, company/organization, date, description).
pub type ProjectEntry = ExperienceEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: EntryId,
    pub degree: String,
    pub school: String,
    pub date: String,
    pub location: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Field selectors
// ────────────────────────────────────────────────────────────────────────────

/// The scalar (non-repeating) text fields of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarField {
    FullName,
    Email,
    Phone,
    Location,
    Linkedin,
    Summary,
}

/// The repeatable entry sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Experience,
    Education,
    Projects,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Experience => "experience",
            Collection::Education => "education",
            Collection::Projects => "projects",
        }
    }
}

/// Field of an entry. Which fields exist depends on the collection:
/// experience/projects use title, company, date, location, description;
/// education uses degree, school, date, location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryField {
    Title,
    Company,
    Date,
    Location,
    Description,
    Degree,
    School,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry behaviour shared by the collection operations
// ────────────────────────────────────────────────────────────────────────────

pub trait Entry {
    fn id(&self) -> EntryId;

    /// Mutable slot for `field`, or `None` when this entry kind has no such field.
    fn field_mut(&mut self, field: EntryField) -> Option<&mut String>;
}

impl Entry for ExperienceEntry {
    fn id(&self) -> EntryId {
        self.id
    }

    fn field_mut(&mut self, field: EntryField) -> Option<&mut String> {
        match field {
            EntryField::Title => Some(&mut self.title),
            EntryField::Company => Some(&mut self.company),
            EntryField::Date => Some(&mut self.date),
            EntryField::Location => Some(&mut self.location),
            EntryField::Description => Some(&mut self.description),
            EntryField::Degree | EntryField::School => None,
        }
    }
}

impl Entry for EducationEntry {
    fn id(&self) -> EntryId {
        self.id
    }

    fn field_mut(&mut self, field: EntryField) -> Option<&mut String> {
        match field {
            EntryField::Degree => Some(&mut self.degree),
            EntryField::School => Some(&mut self.school),
            EntryField::Date => Some(&mut self.date),
            EntryField::Location => Some(&mut self.location),
            EntryField::Title | EntryField::Company | EntryField::Description => None,
        }
    }
}

impl ExperienceEntry {
    /// A freshly added experience row, as shown in the editor before the user types.
    pub fn placeholder(id: EntryId) -> Self {
        Self {
            id,
            title: "Job Title".to_string(),
            company: "Company".to_string(),
            date: "Date".to_string(),
            location: String::new(),
            description: "Description".to_string(),
        }
    }

    pub fn project_placeholder(id: EntryId) -> Self {
        Self {
            id,
            title: "Project Title".to_string(),
            company: String::new(),
            date: "Date".to_string(),
            location: String::new(),
            description: "Description".to_string(),
        }
    }

    /// Description split into display lines; blank lines are dropped.
    pub fn description_lines(&self) -> Vec<String> {
        self.description
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .map(String::from)
            .collect()
    }
}

impl EducationEntry {
    pub fn placeholder(id: EntryId) -> Self {
        Self {
            id,
            degree: "Degree".to_string(),
            school: "School".to_string(),
            date: "Date".to_string(),
            location: String::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document helpers
// ────────────────────────────────────────────────────────────────────────────

impl ResumeDocument {
    /// A fully empty document: every scalar `""`, every collection `[]`.
    pub fn empty() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            linkedin: String::new(),
            summary: String::new(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
        }
    }

    /// The document a new editing session starts with.
    pub fn starter() -> Self {
        Self {
            full_name: "John Doe".to_string(),
            email: "john.doe@email.com".to_string(),
            phone: "(123) 456-7890".to_string(),
            location: "New York, NY".to_string(),
            linkedin: "linkedin.com/in/johndoe".to_string(),
            summary: "A highly motivated and creative Senior Product Designer with over 8 years \
                      of experience in creating user-centered digital products. Proven track record \
                      of leading design teams, conducting user research, and delivering innovative \
                      solutions that drive business growth and enhance user satisfaction."
                .to_string(),
            experience: vec![ExperienceEntry {
                id: 1,
                title: "Senior Product Designer".to_string(),
                company: "TechSolutions Inc.".to_string(),
                date: "Jan 2020 - Present".to_string(),
                location: "San Francisco, CA".to_string(),
                description: "Led the redesign of the company's flagship product, increasing user engagement by 40%.\n\
                              Collaborated with cross-functional teams to define product vision and strategy.\n\
                              Conducted user research and usability testing to inform design decisions.\n\
                              Mentored junior designers and established design system best practices."
                    .to_string(),
            }],
            education: vec![
                EducationEntry {
                    id: 1,
                    degree: "Bachelor of Science in Graphic Design".to_string(),
                    school: "University of Design".to_string(),
                    date: "May 2016".to_string(),
                    location: "Artsfield".to_string(),
                },
                EducationEntry {
                    id: 2,
                    degree: "Certificate in UX Design".to_string(),
                    school: "Design Institute".to_string(),
                    date: "Dec 2018".to_string(),
                    location: "Online".to_string(),
                },
            ],
            skills: [
                "Figma",
                "Adobe XD",
                "React",
                "HTML/CSS",
                "User Research",
                "Prototyping",
                "Design Systems",
                "Wireframing",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            projects: Vec::new(),
        }
    }

    pub fn scalar_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::FullName => &mut self.full_name,
            ScalarField::Email => &mut self.email,
            ScalarField::Phone => &mut self.phone,
            ScalarField::Location => &mut self.location,
            ScalarField::Linkedin => &mut self.linkedin,
            ScalarField::Summary => &mut self.summary,
        }
    }

    /// Largest entry id across all collections, if any entry exists.
    pub fn max_entry_id(&self) -> Option<EntryId> {
        self.experience
            .iter()
            .map(|e| e.id)
            .chain(self.education.iter().map(|e| e.id))
            .chain(self.projects.iter().map(|e| e.id))
            .max()
    }

    /// Plain-text digest sent to the suggestion service.
    pub fn to_plain_text(&self) -> String {
        let experience = self
            .experience
            .iter()
            .map(|e| format!("{} at {}: {}", e.title, e.company, e.description))
            .collect::<Vec<_>>()
            .join("\n");
        let education = self
            .education
            .iter()
            .map(|e| format!("{} at {}", e.degree, e.school))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Name: {}\nSummary: {}\nExperience:\n{}\nEducation:\n{}\nSkills: {}\n",
            self.full_name,
            self.summary,
            experience,
            education,
            self.skills.join(", ")
        )
    }
}
