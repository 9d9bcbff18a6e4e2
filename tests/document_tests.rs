//! Saved documents: settings and phasors travel together

use phasorviz::{Attribute, Document, LoadError, Registry, Settings};
use serde_json::json;

fn sample() -> (Registry, Settings) {
    let mut reg = Registry::new();
    let a = reg.add(Some(3.0), Some(4.0));
    let b = reg.add(None, None);
    reg.set(a, Attribute::Symbol("U".into())).unwrap();
    reg.parse(b, "U * e^(i * 90 * pi/180)").unwrap();
    reg.set(b, Attribute::Parent("U".into())).unwrap();

    let mut settings = Settings::default();
    settings.quadrants = 1;
    settings.grid.show = true;
    settings.labels.textsize = 14;
    (reg, settings)
}

#[test]
fn document_round_trip() {
    let (reg, settings) = sample();
    let transform = json!({ "x": 10.5, "y": -3, "scale": 1.25 });
    let text = Document::to_json(&reg, &settings, Some(transform.clone())).unwrap();

    let mut copy = Registry::new();
    copy.add(Some(9.0), Some(9.0));
    let mut copy_settings = Settings::default();
    let restored = Document::load(&text, &mut copy, &mut copy_settings).unwrap();

    assert_eq!(restored, Some(transform));
    assert_eq!(copy_settings, settings);
    assert_eq!(copy.records(), reg.records());
    assert_eq!(copy.max_magnitude(), reg.max_magnitude());
}

#[test]
fn saved_json_shape() {
    let (reg, settings) = sample();
    let value: serde_json::Value =
        serde_json::from_str(&Document::to_json(&reg, &settings, None).unwrap()).unwrap();

    assert_eq!(value["settings"]["quadrants"], 1);
    assert_eq!(value["settings"]["custom_units"]["use"], false);
    assert_eq!(value["settings"]["grid"]["color"], "rgba(0, 0, 0, 1)");
    let phasors = value["phasors"].as_array().unwrap();
    assert_eq!(phasors.len(), 2);
    assert_eq!(phasors[0]["symbol"], "U");
    assert_eq!(phasors[1]["parent"], 0);
    assert_eq!(phasors[1]["value"], "U * e^(i * 90 * pi/180)");
    assert!(value.get("transform").is_none());
}

#[test]
fn phasor_errors_keep_old_settings() {
    let (reg, settings) = sample();
    let mut doc = Document::capture(&reg, &settings, None);
    doc.phasors[1].parent = 7;

    let mut target = Registry::new();
    let kept = target.add(Some(1.0), Some(0.0));
    let mut target_settings = Settings::default();
    let err = doc.apply(&mut target, &mut target_settings).unwrap_err();

    assert!(matches!(err, LoadError::UnresolvedParent { index: 1, parent: 7 }));
    assert_eq!(target_settings, Settings::default());
    assert_eq!(target.count(), 1);
    assert!(target.get(kept).is_some());
}

#[test]
fn malformed_json_is_rejected() {
    let mut reg = Registry::new();
    let mut settings = Settings::default();
    assert!(matches!(
        Document::load("{\"phasors\": []}", &mut reg, &mut settings),
        Err(LoadError::Json(_))
    ));
    assert!(matches!(
        Document::load("not json", &mut reg, &mut settings),
        Err(LoadError::Json(_))
    ));
}

#[test]
fn older_files_with_color_objects_load() {
    let mut settings = serde_json::to_value(Settings::default()).unwrap();
    settings["legend"]["colors"]["bg"] = json!({ "r": 255, "g": 255, "b": 255, "a": 1 });
    let text = json!({
        "settings": settings,
        "phasors": [{
            "id": 0, "parent": -1, "value": "1 + i * 1", "width": 4, "skin": 0,
            "arrow": 5, "arrow_size": 10, "visible": true, "label": "first",
            "color_index": 0, "color": "rgba(255, 0, 0, 1)", "outline_width": 0,
            "outline_color": "rgba(255, 0, 0, 1)", "symbol": ""
        }]
    })
    .to_string();

    let mut reg = Registry::new();
    let mut loaded = Settings::default();
    Document::load(&text, &mut reg, &mut loaded).unwrap();
    assert_eq!(loaded, Settings::default());
    assert_eq!(reg.count(), 1);
    assert_eq!(reg.get_by_index(0).unwrap().label(), "first");
    assert!(reg.get_by_index(0).unwrap().is_valid());
}

#[test]
fn unusable_custom_units_are_rejected() {
    let (reg, mut settings) = sample();
    settings.custom_units.use_custom = true;
    settings.custom_units.major = 0.0;
    settings.custom_units.minor = 0.0;
    let text = Document::to_json(&reg, &settings, None).unwrap();

    let mut target = Registry::new();
    target.add(Some(1.0), Some(0.0));
    let mut target_settings = Settings::default();
    assert!(matches!(
        Document::load(&text, &mut target, &mut target_settings),
        Err(LoadError::Settings(_))
    ));
    assert_eq!(target.count(), 1);
    assert_eq!(target_settings, Settings::default());
}
