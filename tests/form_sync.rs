use cardioform::{
    CategoricalVariable, Document, FormConfig, FormController, FormDocument, SyncOutcome,
    UnmappedPolicy,
};

fn attach_heart_form() -> FormController<FormDocument> {
    let config = FormConfig::heart_disease();
    FormController::attach(FormDocument::from_config(&config), &config).expect("attach form")
}

fn group_values(
    controller: &FormController<FormDocument>,
    variable: CategoricalVariable,
) -> Vec<String> {
    variable
        .field_names()
        .map(|name| {
            controller
                .document()
                .field_value(name)
                .expect("field present")
                .to_string()
        })
        .collect()
}

fn all_field_values(controller: &FormController<FormDocument>) -> Vec<(String, String)> {
    controller
        .document()
        .hidden_fields()
        .iter()
        .map(|field| (field.name.clone(), field.value.clone()))
        .collect()
}

#[test]
fn every_category_of_every_variable_is_one_hot() {
    let mut controller = attach_heart_form();
    for variable in CategoricalVariable::ALL {
        for (position, &(category, field)) in variable.categories().iter().enumerate() {
            let reports = controller
                .select(variable.selector_id(), category)
                .expect("select");
            assert_eq!(reports.len(), 1);
            assert_eq!(reports[0].outcome.selected_field(), Some(field));

            let values = group_values(&controller, variable);
            let expected: Vec<String> = (0..values.len())
                .map(|idx| (if idx == position { "1" } else { "0" }).to_string())
                .collect();
            assert_eq!(values, expected, "{variable} = {category}");
        }
    }
    assert!(controller.encoded().expect("snapshot").is_one_hot());
}

#[test]
fn fields_reflect_defaults_before_any_interaction() {
    let config = FormConfig::heart_disease();
    let document = FormDocument::from_config(&config);
    assert!(
        document
            .hidden_fields()
            .iter()
            .all(|field| field.value.is_empty())
    );

    let controller = FormController::attach(document, &config).expect("attach");
    let encoded = controller.encoded().expect("snapshot");
    assert!(encoded.is_one_hot());
    for variable in CategoricalVariable::ALL {
        let group = encoded.group(variable.name()).expect("group");
        assert_eq!(group.selected.as_deref(), Some(variable.default_category()));
        assert_eq!(group.selector_value, variable.default_category());
    }
}

#[test]
fn repeated_change_notifications_do_not_alter_state() {
    let mut controller = attach_heart_form();
    controller.select("cp-select", "NAP").expect("select");
    let once = all_field_values(&controller);

    controller.select("cp-select", "NAP").expect("select again");
    controller.resynchronize().expect("resync");
    controller.resynchronize().expect("resync again");

    assert_eq!(all_field_values(&controller), once);
}

#[test]
fn changing_one_selector_leaves_other_groups_untouched() {
    let mut controller = attach_heart_form();
    controller.select("st-slope-select", "Down").expect("select");
    let before = all_field_values(&controller);

    controller.select("sex-select", "F").expect("select");
    let after = all_field_values(&controller);

    for ((name, old), (same_name, new)) in before.iter().zip(after.iter()) {
        assert_eq!(name, same_name);
        if name.starts_with("Sex_") {
            continue;
        }
        assert_eq!(old, new, "{name} changed while editing sex");
    }
}

#[test]
fn unmapped_value_leaves_group_zeroed() {
    let mut controller = attach_heart_form();
    let reports = controller
        .select("resting-ecg-select", "XYZ")
        .expect("zeroed policy does not fail");
    assert_eq!(
        reports[0].outcome,
        SyncOutcome::Unmapped {
            value: "XYZ".to_string()
        }
    );

    assert_eq!(
        group_values(&controller, CategoricalVariable::RestingEcg),
        vec!["0", "0", "0"]
    );
    let encoded = controller.encoded().expect("snapshot");
    let group = encoded.group("resting_ecg").expect("group");
    assert!(group.is_zeroed());
    assert_eq!(group.selected, None);
    assert!(!encoded.is_one_hot());
}

#[test]
fn strict_policy_rejects_unmapped_value() {
    let config = FormConfig::heart_disease().with_policy(UnmappedPolicy::Reject);
    let mut controller =
        FormController::attach(FormDocument::from_config(&config), &config).expect("attach");
    assert!(controller.select("sex-select", "X").is_err());
    assert_eq!(
        group_values(&controller, CategoricalVariable::Sex),
        vec!["0", "0"]
    );
}

#[test]
fn chest_pain_ata_scenario() {
    let mut controller = attach_heart_form();
    controller.select("cp-select", "ATA").expect("select");
    let document = controller.document();
    assert_eq!(document.field_value("ChestPainType_TA"), Ok("0"));
    assert_eq!(document.field_value("ChestPainType_ATA"), Ok("1"));
    assert_eq!(document.field_value("ChestPainType_NAP"), Ok("0"));
    assert_eq!(document.field_value("ChestPainType_ASY"), Ok("0"));
}

#[test]
fn sex_change_scenario() {
    let mut controller = attach_heart_form();
    controller.select("sex-select", "M").expect("select");
    assert_eq!(controller.document().field_value("Sex_M"), Ok("1"));
    assert_eq!(controller.document().field_value("Sex_F"), Ok("0"));

    controller.select("sex-select", "F").expect("select");
    assert_eq!(controller.document().field_value("Sex_M"), Ok("0"));
    assert_eq!(controller.document().field_value("Sex_F"), Ok("1"));
}

#[test]
fn st_slope_flat_scenario() {
    let mut controller = attach_heart_form();
    controller.select("st-slope-select", "Flat").expect("select");
    assert_eq!(
        group_values(&controller, CategoricalVariable::StSlope),
        vec!["0", "1", "0"]
    );
}

#[test]
fn submission_payload_lists_all_hidden_fields() {
    let mut controller = attach_heart_form();
    controller.select("exang-select", "N").expect("select");
    let encoded = controller.encoded().expect("snapshot");
    let pairs = encoded.form_pairs();
    assert_eq!(pairs.len(), 14);
    assert!(pairs.contains(&("ExerciseAngina_Y", "0")));
    assert!(pairs.contains(&("ExerciseAngina_N", "1")));
    assert_eq!(pairs[0], ("ChestPainType_TA", "1"));
}
