#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    MiddleName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
}

impl FormState {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::MiddleName => &self.middle_name,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::MiddleName => &mut self.middle_name,
        }
    }

    pub fn has_required_names(&self) -> bool {
        !self.first_name.is_empty() && !self.last_name.is_empty()
    }

    pub fn middle_name(&self) -> Option<&str> {
        Some(self.middle_name.as_str()).filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl SubmissionStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionStatus::Loading)
    }

    /// Text for the inline status line.
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Success(message) | SubmissionStatus::Error(message) => {
                Some(message)
            }
            SubmissionStatus::Idle | SubmissionStatus::Loading => None,
        }
    }
}
