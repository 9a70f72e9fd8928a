//! The five categorical variables of the heart disease form.
//!
//! Each variable owns a selector in the markup (`<select id="...">`) and a group of
//! hidden inputs named after its categories. The tables here are the fixed wiring of
//! that markup; `FormConfig::heart_disease` turns them into a runtime configuration.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalVariable {
    ChestPainType,
    Sex,
    ExerciseAngina,
    StSlope,
    RestingEcg,
}

impl CategoricalVariable {
    pub const ALL: [Self; 5] = [
        Self::ChestPainType,
        Self::Sex,
        Self::ExerciseAngina,
        Self::StSlope,
        Self::RestingEcg,
    ];

    /// Stable configuration name of the variable.
    pub fn name(self) -> &'static str {
        match self {
            Self::ChestPainType => "chest_pain_type",
            Self::Sex => "sex",
            Self::ExerciseAngina => "exercise_angina",
            Self::StSlope => "st_slope",
            Self::RestingEcg => "resting_ecg",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::ChestPainType => "chest pain type",
            Self::Sex => "sex",
            Self::ExerciseAngina => "exercise-induced angina",
            Self::StSlope => "ST slope",
            Self::RestingEcg => "resting ECG",
        }
    }

    /// Element id of the visible selector.
    pub fn selector_id(self) -> &'static str {
        match self {
            Self::ChestPainType => "cp-select",
            Self::Sex => "sex-select",
            Self::ExerciseAngina => "exang-select",
            Self::StSlope => "st-slope-select",
            Self::RestingEcg => "resting-ecg-select",
        }
    }

    /// `(category, hidden field name)` pairs, in the order the fields appear in the form.
    pub fn categories(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::ChestPainType => &[
                ("TA", "ChestPainType_TA"),
                ("ATA", "ChestPainType_ATA"),
                ("NAP", "ChestPainType_NAP"),
                ("ASY", "ChestPainType_ASY"),
            ],
            Self::Sex => &[("M", "Sex_M"), ("F", "Sex_F")],
            Self::ExerciseAngina => &[("Y", "ExerciseAngina_Y"), ("N", "ExerciseAngina_N")],
            Self::StSlope => &[
                ("Up", "ST_Slope_Up"),
                ("Flat", "ST_Slope_Flat"),
                ("Down", "ST_Slope_Down"),
            ],
            Self::RestingEcg => &[
                ("Normal", "RestingECG_Normal"),
                ("LVH", "RestingECG_LVH"),
                ("ST", "RestingECG_ST"),
            ],
        }
    }

    /// The value a freshly rendered selector holds: its first option.
    pub fn default_category(self) -> &'static str {
        self.categories()[0].0
    }

    pub fn field_names(self) -> impl Iterator<Item = &'static str> {
        self.categories().iter().map(|&(_, field)| field)
    }
}

impl fmt::Display for CategoricalVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn field_names_are_unique_across_variables() {
        let mut seen = HashSet::new();
        for variable in CategoricalVariable::ALL {
            for field in variable.field_names() {
                assert!(seen.insert(field), "field {field} reused");
            }
        }
        assert_eq!(seen.len(), 4 + 2 + 2 + 3 + 3);
    }

    #[test]
    fn selector_ids_are_unique() {
        let ids: HashSet<&str> = CategoricalVariable::ALL
            .into_iter()
            .map(CategoricalVariable::selector_id)
            .collect();
        assert_eq!(ids.len(), CategoricalVariable::ALL.len());
    }

    #[test]
    fn defaults_are_first_options() {
        assert_eq!(CategoricalVariable::ChestPainType.default_category(), "TA");
        assert_eq!(CategoricalVariable::Sex.default_category(), "M");
        assert_eq!(CategoricalVariable::ExerciseAngina.default_category(), "Y");
        assert_eq!(CategoricalVariable::StSlope.default_category(), "Up");
        assert_eq!(CategoricalVariable::RestingEcg.default_category(), "Normal");
    }
}
