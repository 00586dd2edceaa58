//! Default rules for the lifestyle survey form
//!
//! Field names are the contract with the form page (`templates/index.html`);
//! labels and baselines follow the drop-first one-hot encoding used when the
//! model was trained (the alphabetically first option of each group has no
//! column).

use super::ReconcileRules;

impl ReconcileRules {
    /// Rules matching the survey form served at `GET /`
    #[must_use]
    pub fn survey() -> Self {
        Self::new()
            .numeric("Monthly_Grocery_Bill", "Monthly Grocery Bill")
            .numeric("Vehicle_Monthly_Distance_Km", "Vehicle Monthly Distance Km")
            .numeric("Waste_Bag_Weekly_Count", "Waste Bag Weekly Count")
            .numeric("How_Long_TV_PC_Daily_Hour", "How Long TV PC Daily Hour")
            .numeric("How_Many_New_Clothes_Monthly", "How Many New Clothes Monthly")
            .numeric("How_Long_Internet_Daily_Hour", "How Long Internet Daily Hour")
            .choice("Sex", "Sex", Some("female"))
            .choice("Body_Type", "Body Type", Some("normal"))
            .choice("Transport", "Transport", Some("private"))
            .choice("Diet", "Diet", Some("omnivore"))
            .choice("How_Often_Shower", "How Often Shower", Some("daily"))
            .choice("Social_Activity", "Social Activity", Some("never"))
            .choice(
                "Frequency_of_Traveling_by_Air",
                "Frequency of Traveling by Air",
                Some("frequently"),
            )
            .choice("Waste_Bag_Size", "Waste Bag Size", Some("extra large"))
            .choice("Energy_efficiency", "Energy efficiency", Some("No"))
            .choice("Heating_Energy_Source", "Heating Energy Source", Some("coal"))
            .choice("Vehicle_Type", "Vehicle Type", Some("diesel"))
            .multi_choice("Recycling", "Recycling")
            .multi_choice("Cooking_With", "Cooking_With")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reconcile::FormInput, schema::FeatureSchema};

    /// Column list of the trained survey model
    fn survey_columns() -> Vec<String> {
        [
            "Monthly Grocery Bill",
            "Vehicle Monthly Distance Km",
            "Waste Bag Weekly Count",
            "How Long TV PC Daily Hour",
            "How Many New Clothes Monthly",
            "How Long Internet Daily Hour",
            "Body Type_obese",
            "Body Type_overweight",
            "Body Type_underweight",
            "Sex_male",
            "Diet_pescatarian",
            "Diet_vegan",
            "Diet_vegetarian",
            "How Often Shower_less frequently",
            "How Often Shower_more frequently",
            "How Often Shower_twice a day",
            "Heating Energy Source_electricity",
            "Heating Energy Source_natural gas",
            "Heating Energy Source_wood",
            "Transport_public",
            "Transport_walk/bicycle",
            "Vehicle Type_electric",
            "Vehicle Type_hybrid",
            "Vehicle Type_lpg",
            "Vehicle Type_petrol",
            "Social Activity_often",
            "Social Activity_sometimes",
            "Frequency of Traveling by Air_never",
            "Frequency of Traveling by Air_rarely",
            "Frequency of Traveling by Air_very frequently",
            "Waste Bag Size_large",
            "Waste Bag Size_medium",
            "Waste Bag Size_small",
            "Energy efficiency_Sometimes",
            "Energy efficiency_Yes",
            "Recycling_Glass",
            "Recycling_Metal",
            "Recycling_Paper",
            "Recycling_Plastic",
            "Cooking_With_Airfryer",
            "Cooking_With_Grill",
            "Cooking_With_Microwave",
            "Cooking_With_Oven",
            "Cooking_With_Stove",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    #[test]
    fn test_survey_rules_match_trained_columns() {
        let schema = FeatureSchema::new(survey_columns()).expect("schema");
        assert!(ReconcileRules::survey().validate(&schema).is_empty());
    }

    #[test]
    fn test_survey_counts() {
        let rules = ReconcileRules::survey();
        assert_eq!(rules.numeric_fields().len(), 6);
        assert_eq!(rules.choice_fields().len(), 11);
        assert_eq!(rules.multi_choice_fields().len(), 2);
    }

    #[test]
    fn test_full_survey_submission() {
        let schema = FeatureSchema::new(survey_columns()).expect("schema");
        let form = FormInput::from_pairs([
            ("Monthly_Grocery_Bill", "230"),
            ("Vehicle_Monthly_Distance_Km", "1200.5"),
            ("Waste_Bag_Weekly_Count", "three"),
            ("Sex", "female"),
            ("Body_Type", "overweight"),
            ("Transport", "public"),
            ("Diet", "vegan"),
            ("How_Often_Shower", "twice a day"),
            ("Waste_Bag_Size", "extra large"),
            ("Energy_efficiency", "Yes"),
            ("Recycling", "Metal"),
            ("Recycling", "Plastic"),
            ("Cooking_With_Oven", "on"),
        ]);

        let v = ReconcileRules::survey().reconcile(&form, &schema);
        let at = |name: &str| v.get(schema.index_of(name).expect(name)).expect("in range");

        assert_eq!(v.len(), schema.len());
        assert_eq!(at("Monthly Grocery Bill"), 230.0);
        assert_eq!(at("Vehicle Monthly Distance Km"), 1200.5);
        assert_eq!(at("Waste Bag Weekly Count"), 0.0);
        assert_eq!(at("Sex_male"), 0.0);
        assert_eq!(at("Body Type_overweight"), 1.0);
        assert_eq!(at("Transport_public"), 1.0);
        assert_eq!(at("Diet_vegan"), 1.0);
        assert_eq!(at("How Often Shower_twice a day"), 1.0);
        assert_eq!(at("Energy efficiency_Yes"), 1.0);
        assert_eq!(at("Recycling_Metal"), 1.0);
        assert_eq!(at("Recycling_Plastic"), 1.0);
        assert_eq!(at("Recycling_Glass"), 0.0);
        assert_eq!(at("Cooking_With_Oven"), 1.0);

        for col in schema.group_columns("Waste Bag Size") {
            assert_eq!(at(col), 0.0, "{col}");
        }
        let ones = v.as_slice().iter().filter(|&&x| x == 1.0).count();
        assert_eq!(ones, 8);
    }
}
