//! Client details data types

use shared_types::{
    FIELD_ADDRESS, FIELD_CITY, FIELD_DEPENDENTS, FIELD_EMAIL, FIELD_FILING_STATUS,
    FIELD_FIRST_NAME, FIELD_LAST_NAME, FIELD_MIDDLE_NAME, FIELD_PHONE, FIELD_SPOUSE_EMAIL,
    FIELD_SPOUSE_FIRST_NAME, FIELD_SPOUSE_LAST_NAME, FIELD_SPOUSE_PHONE, FIELD_STATE,
    FIELD_ZIP_CODE,
};

/// Tabs of the details screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Profile,
    Locks,
}

impl DetailTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailTab::Profile => "profile",
            DetailTab::Locks => "locks",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Profile => "Profile",
            DetailTab::Locks => "Field locks",
        }
    }

    /// Unknown names fall back to the profile tab.
    pub fn parse(name: &str) -> Self {
        match name {
            "locks" => DetailTab::Locks,
            _ => DetailTab::Profile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Number,
    FilingStatus,
}

impl FieldKind {
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Email => "email",
            FieldKind::Phone => "tel",
            FieldKind::Number => "number",
            FieldKind::Text | FieldKind::FilingStatus => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { name, label, kind }
}

pub struct FormSection {
    pub title: &'static str,
    pub fields: &'static [FieldDef],
    /// Only shown when the filing status involves a spouse or spouse data exists
    pub spouse: bool,
}

pub const PROFILE_SECTIONS: &[FormSection] = &[
    FormSection {
        title: "Personal",
        fields: &[
            field(FIELD_FIRST_NAME, "First name", FieldKind::Text),
            field(FIELD_MIDDLE_NAME, "Middle name", FieldKind::Text),
            field(FIELD_LAST_NAME, "Last name", FieldKind::Text),
            field(FIELD_FILING_STATUS, "Filing status", FieldKind::FilingStatus),
            field(FIELD_DEPENDENTS, "Dependents", FieldKind::Number),
        ],
        spouse: false,
    },
    FormSection {
        title: "Contact",
        fields: &[
            field(FIELD_EMAIL, "Email", FieldKind::Email),
            field(FIELD_PHONE, "Phone", FieldKind::Phone),
            field(FIELD_ADDRESS, "Address", FieldKind::Text),
            field(FIELD_CITY, "City", FieldKind::Text),
            field(FIELD_STATE, "State", FieldKind::Text),
            field(FIELD_ZIP_CODE, "ZIP code", FieldKind::Text),
        ],
        spouse: false,
    },
    FormSection {
        title: "Spouse",
        fields: &[
            field(FIELD_SPOUSE_FIRST_NAME, "Spouse first name", FieldKind::Text),
            field(FIELD_SPOUSE_LAST_NAME, "Spouse last name", FieldKind::Text),
            field(FIELD_SPOUSE_EMAIL, "Spouse email", FieldKind::Email),
            field(FIELD_SPOUSE_PHONE, "Spouse phone", FieldKind::Phone),
        ],
        spouse: true,
    },
];
