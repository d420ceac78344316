use serde_json::json;

use super::*;

fn parse(value: serde_json::Value) -> Product {
    serde_json::from_value(value).expect("fixture should deserialize")
}

#[test]
fn bare_string_options_derive_values_in_first_seen_order() {
    let product = parse(json!({
        "title": "Tee",
        "price": 1500,
        "options": ["Size"],
        "variants": [
            { "id": 1, "price": 1500, "available": true, "option1": "M" },
            { "id": 2, "price": 1500, "available": true, "option1": "S" },
            { "id": 3, "price": 1500, "available": true, "option1": "M" },
            { "id": 4, "price": 1500, "available": true, "option1": "L" }
        ]
    }));

    let names: Vec<&str> = product.options[0]
        .values
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, vec!["M", "S", "L"]);
    assert_eq!(product.options[0].slot, SlotKey::from_index(0));
}

#[test]
fn structured_options_keep_declared_values_and_swatches() {
    let product = parse(json!({
        "title": "Tee",
        "options": [{
            "name": "Color",
            "values": [
                { "name": "Black", "swatch": { "color": "0 0 0" } },
                { "name": "Sky", "swatch": { "image": "https://cdn.example.com/sky.png" } },
                { "name": "Red" }
            ]
        }],
        "variants": [{ "id": 1, "price": 100, "available": true, "option1": "Black" }]
    }));

    let values = &product.options[0].values;
    assert_eq!(values.len(), 3);
    assert_eq!(
        values[0].swatch.as_ref().and_then(|s| s.color.as_deref()),
        Some("0 0 0")
    );
    assert_eq!(
        values[1].swatch.as_ref().and_then(|s| s.image.as_deref()),
        Some("https://cdn.example.com/sky.png")
    );
    assert!(values[2].swatch.is_none());
}

#[test]
fn structured_option_values_may_be_plain_strings() {
    let product = parse(json!({
        "title": "Tee",
        "options": [{ "name": "Size", "values": ["S", "M"] }],
        "variants": [{ "id": 1, "price": 100, "available": true, "option1": "S" }]
    }));
    let names: Vec<&str> = product.options[0]
        .values
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, vec!["S", "M"]);
}

#[test]
fn both_option_shapes_resolve_to_the_same_name() {
    let legacy = parse(json!({
        "title": "Tee",
        "options": ["Color"],
        "variants": [{ "id": 1, "price": 100, "available": true, "option1": "Black" }]
    }));
    let structured = parse(json!({
        "title": "Tee",
        "options": [{ "name": "Color", "values": [{ "name": "Black" }] }],
        "variants": [{ "id": 1, "price": 100, "available": true, "option1": "Black" }]
    }));
    assert_eq!(legacy.options[0].name, structured.options[0].name);
    assert_eq!(legacy.options[0].values, structured.options[0].values);
}

#[test]
fn variant_slot_fields_are_positional_and_null_is_absent() {
    let product = parse(json!({
        "title": "Tee",
        "options": ["Color", "Size"],
        "variants": [{
            "id": 9,
            "price": 100,
            "available": true,
            "option1": "Black",
            "option2": "M",
            "option3": null,
            "title": "Black / M"
        }]
    }));
    let variant = &product.variants[0];
    assert_eq!(variant.option_value(SlotKey::from_index(0)), Some("Black"));
    assert_eq!(variant.option_value(SlotKey::from_index(1)), Some("M"));
    assert_eq!(variant.option_value(SlotKey::from_index(2)), None);
    assert_eq!(variant.option_value(SlotKey::from_index(7)), None);
}

#[test]
fn huge_slot_keys_do_not_allocate_positionally() {
    let product = parse(json!({
        "title": "Tee",
        "options": ["Color"],
        "variants": [{
            "id": 1,
            "available": true,
            "option1": "Black",
            "option400000000000000000": "x",
            "option4000000000": "y"
        }]
    }));
    let variant = &product.variants[0];
    assert_eq!(variant.option_value(SlotKey::from_index(0)), Some("Black"));
    assert_eq!(variant.option_value(SlotKey::from_index(3_999_999_999)), Some("y"));
    assert_eq!(product.options[0].values.len(), 1);
}

#[test]
fn huge_slot_keys_in_a_hotspot_payload_still_open() {
    let raw = "{&quot;title&quot;:&quot;Tee&quot;,&quot;options&quot;:[&quot;Color&quot;],\
               &quot;variants&quot;:[{&quot;id&quot;:1,&quot;available&quot;:true,\
               &quot;option1&quot;:&quot;Black&quot;,&quot;option99999999999&quot;:&quot;x&quot;}]}";
    let product = crate::payload::decode_product_payload(raw).unwrap();
    assert_eq!(product.variants[0].id, 1);
}

#[test]
fn missing_variants_field_fails_to_deserialize() {
    let result = serde_json::from_value::<Product>(json!({ "title": "Tee", "options": [] }));
    assert!(result.is_err());
}

#[test]
fn optional_fields_default() {
    let product = parse(json!({ "variants": [] }));
    assert_eq!(product.title, "");
    assert_eq!(product.description, "");
    assert_eq!(product.price, 0);
    assert!(product.featured_image.is_none());
    assert!(product.options.is_empty());
}

#[test]
fn option_kind_matching_is_case_insensitive_and_exact() {
    assert_eq!(OptionKind::from_name("COLOR"), OptionKind::Color);
    assert_eq!(OptionKind::from_name("size"), OptionKind::Size);
    assert_eq!(OptionKind::from_name("Colour"), OptionKind::Other);
    assert_eq!(OptionKind::from_name("Shoe size"), OptionKind::Other);
}

#[test]
fn slot_for_label_uses_declared_order_and_exact_name() {
    let product = parse(json!({
        "title": "Tee",
        "options": ["Size", "Color", "Material"],
        "variants": [{ "id": 1, "price": 100, "available": true,
                       "option1": "M", "option2": "Black", "option3": "Cotton" }]
    }));
    assert_eq!(product.slot_for_label("Size"), Some(SlotKey::from_index(0)));
    assert_eq!(product.slot_for_label("Color"), Some(SlotKey::from_index(1)));
    assert_eq!(product.slot_for_label("Material"), Some(SlotKey::from_index(2)));
    assert_eq!(product.slot_for_label("color"), None);
}

#[test]
fn first_available_variant_skips_sold_out() {
    let product = parse(json!({
        "title": "Jacket",
        "variants": [
            { "id": 1, "price": 100, "available": false },
            { "id": 2, "price": 100, "available": true },
            { "id": 3, "price": 100, "available": true }
        ]
    }));
    assert_eq!(product.first_available_variant().map(|v| v.id), Some(2));
}
