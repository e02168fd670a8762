use std::fmt;
use serde::{Serialize, Deserialize};
use validator::Validate;

/// The eight health indicators sent to the prediction service.
///
/// Field names on the wire are fixed by the service and must not change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct HealthRecord {
    #[serde(rename = "Pregnancies")]
    #[validate(range(min = 0.0))]
    pub pregnancies: f64,

    #[serde(rename = "Glucose")]
    #[validate(range(min = 0.0))]
    pub glucose: f64,

    #[serde(rename = "BloodPressure")]
    #[validate(range(min = 0.0))]
    pub blood_pressure: f64,

    #[serde(rename = "SkinThickness")]
    #[validate(range(min = 0.0))]
    pub skin_thickness: f64,

    #[serde(rename = "Insulin")]
    #[validate(range(min = 0.0))]
    pub insulin: f64,

    #[serde(rename = "BMI")]
    #[validate(range(min = 0.0))]
    pub bmi: f64,

    #[serde(rename = "DiabetesPedigreeFunction")]
    #[validate(range(min = 0.0))]
    pub diabetes_pedigree_function: f64,

    #[serde(rename = "Age")]
    #[validate(range(min = 0.0))]
    pub age: f64,
}

impl HealthRecord {
    pub fn get(&self, field: HealthField) -> f64 {
        match field {
            HealthField::Pregnancies => self.pregnancies,
            HealthField::Glucose => self.glucose,
            HealthField::BloodPressure => self.blood_pressure,
            HealthField::SkinThickness => self.skin_thickness,
            HealthField::Insulin => self.insulin,
            HealthField::Bmi => self.bmi,
            HealthField::DiabetesPedigreeFunction => self.diabetes_pedigree_function,
            HealthField::Age => self.age,
        }
    }

    fn slot(&mut self, field: HealthField) -> &mut f64 {
        match field {
            HealthField::Pregnancies => &mut self.pregnancies,
            HealthField::Glucose => &mut self.glucose,
            HealthField::BloodPressure => &mut self.blood_pressure,
            HealthField::SkinThickness => &mut self.skin_thickness,
            HealthField::Insulin => &mut self.insulin,
            HealthField::Bmi => &mut self.bmi,
            HealthField::DiabetesPedigreeFunction => &mut self.diabetes_pedigree_function,
            HealthField::Age => &mut self.age,
        }
    }
}

/// Advisory input hints shown next to a field. Never enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldHint {
    pub placeholder: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthField {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

impl HealthField {
    /// Form order.
    pub const ALL: [HealthField; 8] = [
        HealthField::Pregnancies,
        HealthField::Glucose,
        HealthField::BloodPressure,
        HealthField::SkinThickness,
        HealthField::Insulin,
        HealthField::Bmi,
        HealthField::DiabetesPedigreeFunction,
        HealthField::Age,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            HealthField::Pregnancies => "Pregnancies",
            HealthField::Glucose => "Glucose",
            HealthField::BloodPressure => "BloodPressure",
            HealthField::SkinThickness => "SkinThickness",
            HealthField::Insulin => "Insulin",
            HealthField::Bmi => "BMI",
            HealthField::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            HealthField::Age => "Age",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthField::Pregnancies => "Pregnancies",
            HealthField::Glucose => "Glucose (mg/dL)",
            HealthField::BloodPressure => "Blood Pressure (mm Hg)",
            HealthField::SkinThickness => "Skin Thickness (mm)",
            HealthField::Insulin => "Insulin (μU/mL)",
            HealthField::Bmi => "BMI (kg/m²)",
            HealthField::DiabetesPedigreeFunction => "Diabetes Pedigree",
            HealthField::Age => "Age (years)",
        }
    }

    pub fn hint(self) -> FieldHint {
        let (placeholder, min, max, step) = match self {
            HealthField::Pregnancies => ("0-17", 0.0, 17.0, 1.0),
            HealthField::Glucose => ("70-200", 0.0, 300.0, 1.0),
            HealthField::BloodPressure => ("60-120", 0.0, 200.0, 1.0),
            HealthField::SkinThickness => ("10-50", 0.0, 100.0, 1.0),
            HealthField::Insulin => ("0-300", 0.0, 900.0, 1.0),
            HealthField::Bmi => ("18-40", 0.0, 70.0, 0.1),
            HealthField::DiabetesPedigreeFunction => ("0.0-2.5", 0.0, 3.0, 0.001),
            HealthField::Age => ("21-80", 1.0, 120.0, 1.0),
        };
        FieldHint { placeholder, min, max, step }
    }

    /// Accepts either the wire name or the Rust field name.
    pub fn from_key(key: &str) -> Option<HealthField> {
        HealthField::ALL.into_iter().find(|field| {
            field.wire_name() == key || field.rust_name() == key
        })
    }

    fn rust_name(self) -> &'static str {
        match self {
            HealthField::Pregnancies => "pregnancies",
            HealthField::Glucose => "glucose",
            HealthField::BloodPressure => "blood_pressure",
            HealthField::SkinThickness => "skin_thickness",
            HealthField::Insulin => "insulin",
            HealthField::Bmi => "bmi",
            HealthField::DiabetesPedigreeFunction => "diabetes_pedigree_function",
            HealthField::Age => "age",
        }
    }
}

impl fmt::Display for HealthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: HealthField,
    pub value: f64,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_finite() {
            write!(f, "{} must not be negative (got {})", self.field, self.value)
        } else {
            write!(f, "{} must be a finite number (got {})", self.field, self.value)
        }
    }
}

/// Coerces raw input to a number the way a browser number field does:
/// empty or unparseable input becomes zero, a numeric prefix is kept.
pub fn parse_numeric(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Field-by-field capture of a [`HealthRecord`].
#[derive(Debug, Clone, Default)]
pub struct FormCapture {
    record: HealthRecord,
}

impl FormCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites exactly one field. Malformed input silently becomes zero.
    pub fn set(&mut self, field: HealthField, raw: &str) {
        *self.record.slot(field) = parse_numeric(raw);
    }

    pub fn set_value(&mut self, field: HealthField, value: f64) {
        *self.record.slot(field) = value;
    }

    pub fn record(&self) -> &HealthRecord {
        &self.record
    }

    /// Emits the current record verbatim.
    pub fn submit(&self) -> HealthRecord {
        self.record
    }

    /// Checks that every field is a finite, non-negative number.
    /// The advisory min/max/step hints are not enforced here.
    pub fn validate(&self) -> Result<HealthRecord, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Err(report) = self.record.validate() {
            for key in report.field_errors().keys() {
                if let Some(field) = HealthField::from_key(key) {
                    errors.push(FieldError { field, value: self.record.get(field) });
                }
            }
        }
        for field in HealthField::ALL {
            let value = self.record.get(field);
            if !value.is_finite() && !errors.iter().any(|e| e.field == field) {
                errors.push(FieldError { field, value });
            }
        }

        if errors.is_empty() {
            Ok(self.record)
        } else {
            errors.sort_by_key(|e| HealthField::ALL.iter().position(|f| *f == e.field));
            Err(errors)
        }
    }
}
