use serde_json::json;

use super::*;

fn booth_json() -> serde_json::Value {
    json!({
        "id": "tpl-1",
        "name": "Film Strip",
        "imageUrl": "overlays/strip.png",
        "backgroundColor": "#ffffff",
        "layout": {
            "width": 1080,
            "height": 1920,
            "slots": [
                {"id": "slot1", "x": 140, "y": 250, "width": 800, "height": 500, "targetTakeIndex": 0},
                {"id": "slot2", "x": 140, "y": 800, "width": 800, "height": 500, "targetTakeIndex": 1, "rotation": -4.5},
                {"id": "slot3", "x": 140, "y": 1350, "width": 800, "height": 500, "layerOrder": "top"}
            ]
        }
    })
}

#[test]
fn parses_authoring_json_with_defaults() {
    let t = Template::from_json_str(&booth_json().to_string()).unwrap();
    assert!(t.active);
    assert_eq!(t.layout.canvas().unwrap(), Canvas::new(1080, 1920).unwrap());
    assert_eq!(t.layout.slots[0].layer_order, LayerOrder::Bottom);
    assert_eq!(t.layout.slots[2].layer_order, LayerOrder::Top);
    assert_eq!(t.layout.slots[1].rotation_deg(), -4.5);
    assert_eq!(t.layout.slots[0].rotation_deg(), 0.0);
    assert_eq!(t.layout.slots[2].target_take_index, None);
    assert_eq!(t.layout.slots[2].default_take_index(2), 2);
    assert_eq!(t.layout.expected_photo_count(), 3);
    assert_eq!(
        t.background_or(ColorDef::rgba(0.0, 0.0, 0.0, 1.0)).to_rgba8(),
        [255, 255, 255, 255]
    );
}

#[test]
fn serialization_keeps_camel_case_keys() {
    let t = Template::from_json_str(&booth_json().to_string()).unwrap();
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["layout"]["slots"][0]["targetTakeIndex"], json!(0));
    assert_eq!(v["layout"]["slots"][2]["layerOrder"], json!("top"));
    assert_eq!(v["imageUrl"], json!("overlays/strip.png"));
}

#[test]
fn rejects_empty_canvas_and_duplicate_ids() {
    let mut v = booth_json();
    v["layout"]["width"] = json!(0);
    assert!(Template::from_json_str(&v.to_string()).is_err());

    let mut v = booth_json();
    v["layout"]["slots"][1]["id"] = json!("slot1");
    let err = Template::from_json_str(&v.to_string()).unwrap_err();
    assert!(err.to_string().contains("duplicate slot id"));
}

#[test]
fn rejects_canvas_beyond_raster_limit() {
    let mut v = booth_json();
    v["layout"]["width"] = json!(70_000);
    v["layout"]["height"] = json!(10);
    let err = Template::from_json_str(&v.to_string()).unwrap_err();
    assert!(matches!(err, BoothError::Validation(_)));

    let mut v = booth_json();
    v["layout"]["height"] = json!(65_535);
    assert!(Template::from_json_str(&v.to_string()).is_ok());
}

#[test]
fn rejects_degenerate_slots() {
    let mut v = booth_json();
    v["layout"]["slots"][0]["width"] = json!(0);
    assert!(Template::from_json_str(&v.to_string()).is_err());

    let mut v = booth_json();
    v["layout"]["slots"][0]["id"] = json!("  ");
    assert!(Template::from_json_str(&v.to_string()).is_err());

    let mut v = booth_json();
    v["id"] = json!("");
    assert!(Template::from_json_str(&v.to_string()).is_err());
}

#[test]
fn out_of_canvas_slot_is_accepted() {
    let mut v = booth_json();
    v["layout"]["slots"][0]["x"] = json!(1000);
    assert!(Template::from_json_str(&v.to_string()).is_ok());
}

#[test]
fn active_filter_preserves_order() {
    let a = Template::from_json_str(&booth_json().to_string()).unwrap();
    let mut b = a.clone();
    b.id = "tpl-2".to_string();
    b.active = false;
    let mut c = a.clone();
    c.id = "tpl-3".to_string();

    let all = vec![a, b, c];
    let ids: Vec<&str> = active_templates(&all).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["tpl-1", "tpl-3"]);
}
