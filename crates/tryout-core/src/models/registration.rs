//! The in-progress registration record and its submission snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

use super::options::{Gender, GradeLevel};
use crate::wizard::Step;

/// How a field is edited and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, must be non-empty
    Text,
    /// Free text matching the email pattern
    Email,
    /// Masked `(XXX) XXX-XXXX` input
    Phone,
    /// Five digits
    Zip,
    /// One of a fixed list of options
    Choice,
}

/// Every field on the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PlayerFirstName,
    PlayerLastName,
    GradeLevel,
    Gender,
    ParentName,
    Email,
    Phone,
    Street,
    Town,
    State,
    Zip,
    EmergencyContactName,
    EmergencyContactNumber,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::PlayerFirstName,
        Field::PlayerLastName,
        Field::GradeLevel,
        Field::Gender,
        Field::ParentName,
        Field::Email,
        Field::Phone,
        Field::Street,
        Field::Town,
        Field::State,
        Field::Zip,
        Field::EmergencyContactName,
        Field::EmergencyContactNumber,
    ];

    /// Fields shown on the given step, in display order.
    pub fn for_step(step: Step) -> &'static [Field] {
        match step {
            Step::Player => &Self::ALL[0..4],
            Step::Parent => &Self::ALL[4..7],
            Step::Address => &Self::ALL[7..13],
        }
    }

    pub fn step(&self) -> Step {
        match self {
            Field::PlayerFirstName | Field::PlayerLastName | Field::GradeLevel | Field::Gender => {
                Step::Player
            }
            Field::ParentName | Field::Email | Field::Phone => Step::Parent,
            Field::Street
            | Field::Town
            | Field::State
            | Field::Zip
            | Field::EmergencyContactName
            | Field::EmergencyContactNumber => Step::Address,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Email => FieldKind::Email,
            Field::Phone | Field::EmergencyContactNumber => FieldKind::Phone,
            Field::Zip => FieldKind::Zip,
            Field::GradeLevel | Field::Gender | Field::State => FieldKind::Choice,
            _ => FieldKind::Text,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::PlayerFirstName => "Player First Name",
            Field::PlayerLastName => "Player Last Name",
            Field::GradeLevel => "Grade Level",
            Field::Gender => "Gender",
            Field::ParentName => "Parent/Guardian Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Street => "Street",
            Field::Town => "Town",
            Field::State => "State",
            Field::Zip => "Zip",
            Field::EmergencyContactName => "Emergency Contact",
            Field::EmergencyContactNumber => "Emergency Phone",
        }
    }

    /// Key used for this field in the JSON payload.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Field::PlayerFirstName => "playerFirstName",
            Field::PlayerLastName => "playerLastName",
            Field::GradeLevel => "gradeLevel",
            Field::Gender => "gender",
            Field::ParentName => "parentName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Street => "street",
            Field::Town => "town",
            Field::State => "state",
            Field::Zip => "zip",
            Field::EmergencyContactName => "emergencyContactName",
            Field::EmergencyContactNumber => "emergencyContactNumber",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Form state while the user is editing. Values are stored exactly as typed;
/// trimming happens when the payload is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub player_first_name: String,
    pub player_last_name: String,
    pub grade_level: Option<GradeLevel>,
    pub gender: Option<Gender>,
    pub parent_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub town: String,
    pub state: String,
    pub zip: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
}

impl RegistrationRecord {
    /// Current value of a field as it should be displayed.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::PlayerFirstName => &self.player_first_name,
            Field::PlayerLastName => &self.player_last_name,
            Field::GradeLevel => self.grade_level.map(|g| g.label()).unwrap_or(""),
            Field::Gender => self.gender.map(|g| g.label()).unwrap_or(""),
            Field::ParentName => &self.parent_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Street => &self.street,
            Field::Town => &self.town,
            Field::State => &self.state,
            Field::Zip => &self.zip,
            Field::EmergencyContactName => &self.emergency_contact_name,
            Field::EmergencyContactNumber => &self.emergency_contact_number,
        }
    }

    /// Mutable access to a text-backed field. Returns `None` for the enum
    /// fields, which are set through their typed setters.
    pub(crate) fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::PlayerFirstName => Some(&mut self.player_first_name),
            Field::PlayerLastName => Some(&mut self.player_last_name),
            Field::ParentName => Some(&mut self.parent_name),
            Field::Email => Some(&mut self.email),
            Field::Phone => Some(&mut self.phone),
            Field::Street => Some(&mut self.street),
            Field::Town => Some(&mut self.town),
            Field::State => Some(&mut self.state),
            Field::Zip => Some(&mut self.zip),
            Field::EmergencyContactName => Some(&mut self.emergency_contact_name),
            Field::EmergencyContactNumber => Some(&mut self.emergency_contact_number),
            Field::GradeLevel | Field::Gender => None,
        }
    }
}

/// Immutable snapshot sent to `POST /auth/register`.
///
/// Phone numbers stay in their `(XXX) XXX-XXXX` display form; the backend
/// normalizes them if it needs digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub player_first_name: String,
    pub player_last_name: String,
    pub parent_name: String,
    pub email: String,
    pub grade_level: GradeLevel,
    pub phone: String,
    pub gender: Gender,
    pub street: String,
    pub town: String,
    pub state: String,
    pub zip: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
}

impl RegistrationPayload {
    /// Freeze a record into a payload: free text is trimmed and the email is
    /// lower-cased. Returns the first unset choice field if one is missing.
    pub fn from_record(record: &RegistrationRecord) -> Result<Self, Field> {
        let grade_level = record.grade_level.ok_or(Field::GradeLevel)?;
        let gender = record.gender.ok_or(Field::Gender)?;

        Ok(Self {
            player_first_name: record.player_first_name.trim().to_string(),
            player_last_name: record.player_last_name.trim().to_string(),
            parent_name: record.parent_name.trim().to_string(),
            email: record.email.trim().to_lowercase(),
            grade_level,
            phone: record.phone.clone(),
            gender,
            street: record.street.trim().to_string(),
            town: record.town.trim().to_string(),
            state: record.state.trim().to_string(),
            zip: record.zip.trim().to_string(),
            emergency_contact_name: record.emergency_contact_name.trim().to_string(),
            emergency_contact_number: record.emergency_contact_number.clone(),
        })
    }

    pub fn player_full_name(&self) -> String {
        format!("{} {}", self.player_first_name, self.player_last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_record() -> RegistrationRecord {
        RegistrationRecord {
            player_first_name: "  Jamie ".to_string(),
            player_last_name: "Rivera".to_string(),
            grade_level: Some(GradeLevel::Sixth),
            gender: Some(Gender::NonBinary),
            parent_name: " Alex Rivera ".to_string(),
            email: "  Alex.Rivera@Example.COM ".to_string(),
            phone: "(860) 555-1234".to_string(),
            street: "12 Elm St ".to_string(),
            town: "Hartford".to_string(),
            state: "CT".to_string(),
            zip: "06103".to_string(),
            emergency_contact_name: "Pat Rivera".to_string(),
            emergency_contact_number: "(860) 555-9876".to_string(),
        }
    }

    #[test]
    fn test_field_steps_partition_all_fields() {
        let total: usize = [Step::Player, Step::Parent, Step::Address]
            .iter()
            .map(|s| Field::for_step(*s).len())
            .sum();
        assert_eq!(total, Field::ALL.len());

        for step in [Step::Player, Step::Parent, Step::Address] {
            for field in Field::for_step(step) {
                assert_eq!(field.step(), step, "{} listed under wrong step", field);
            }
        }
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(Field::Email.kind(), FieldKind::Email);
        assert_eq!(Field::EmergencyContactNumber.kind(), FieldKind::Phone);
        assert_eq!(Field::Zip.kind(), FieldKind::Zip);
        assert_eq!(Field::State.kind(), FieldKind::Choice);
        assert_eq!(Field::Town.kind(), FieldKind::Text);
    }

    #[test]
    fn test_payload_normalizes_text() {
        let payload = RegistrationPayload::from_record(&filled_record()).unwrap();
        assert_eq!(payload.player_first_name, "Jamie");
        assert_eq!(payload.parent_name, "Alex Rivera");
        assert_eq!(payload.email, "alex.rivera@example.com");
        assert_eq!(payload.street, "12 Elm St");
        // Phones keep their display mask
        assert_eq!(payload.phone, "(860) 555-1234");
        assert_eq!(payload.emergency_contact_number, "(860) 555-9876");
    }

    #[test]
    fn test_payload_wire_keys_match_field_names() {
        let payload = RegistrationPayload::from_record(&filled_record()).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), Field::ALL.len());
        for field in Field::ALL {
            assert!(obj.contains_key(field.wire_name()), "missing key {}", field.wire_name());
        }
        assert_eq!(obj["gradeLevel"], "6th Grade");
        assert_eq!(obj["gender"], "Non-binary");
    }

    #[test]
    fn test_payload_requires_choices() {
        let mut record = filled_record();
        record.gender = None;
        assert_eq!(RegistrationPayload::from_record(&record), Err(Field::Gender));

        record.grade_level = None;
        assert_eq!(RegistrationPayload::from_record(&record), Err(Field::GradeLevel));
    }

    #[test]
    fn test_record_value_for_choices() {
        let mut record = RegistrationRecord::default();
        assert_eq!(record.value(Field::GradeLevel), "");
        record.grade_level = Some(GradeLevel::Eighth);
        assert_eq!(record.value(Field::GradeLevel), "8th Grade");
        assert!(record.text_mut(Field::Gender).is_none());
    }
}
