use super::*;

#[test]
fn test_index_entry_layout() {
    let layout = index_entry_layout();
    let compound = layout.as_compound().expect("index entry is a compound");
    assert_eq!(compound.size, 8);
    assert_eq!(compound.fields.len(), 2);
    assert_eq!(compound.fields[0].name, "stream");
    assert_eq!(compound.fields[0].offset, 0);
    assert_eq!(compound.fields[1].name, "index");
    assert_eq!(compound.fields[1].offset, 4);
}

#[test]
fn test_encoding_counters_layout() {
    let layout = encoding_counters_layout();
    let compound = layout.as_compound().unwrap();
    // nine u16 counters plus the user counter array
    assert_eq!(compound.fields.len(), 10);
    assert_eq!(layout.size(), 9 * 2 + USER_INTS * 2);
    let user = compound.field("user").unwrap();
    assert_eq!(user.ty, TypeDescriptor::array(PrimitiveKind::U16, USER_INTS));
    assert_eq!(user.offset, 18);
}

#[test]
fn test_acquisition_header_size() {
    assert_eq!(acquisition_header_layout().size(), 344);
    assert!(!acquisition_header_layout().is_variable());
}

#[test]
fn test_acquisition_header_field_order() {
    let compound = acquisition_header_layout().as_compound().unwrap();
    let names: Vec<&str> = compound.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names.first(), Some(&"version"));
    assert_eq!(names.last(), Some(&"user_float"));
    assert_eq!(compound.field("flags").unwrap().offset, 6);
    assert_eq!(compound.field("channel_mask").unwrap().offset, 44);
    assert_eq!(compound.field("idx").unwrap().ty, *encoding_counters_layout());
}

#[test]
fn test_acquisition_record_layout_nests_header() {
    let layout = acquisition_record_layout();
    assert!(layout.is_variable());
    assert_eq!(layout.size(), 344 + 2 * VARLEN_SLOT_SIZE);

    let compound = layout.as_compound().unwrap();
    assert_eq!(compound.field("head").unwrap().ty, *acquisition_header_layout());
    assert_eq!(
        compound.field("traj").unwrap().ty,
        TypeDescriptor::var_len(PrimitiveKind::F32)
    );
    assert_eq!(compound.field("data").unwrap().offset, 344 + VARLEN_SLOT_SIZE);
}

#[test]
fn test_layouts_are_built_once() {
    assert!(std::ptr::eq(acquisition_record_layout(), acquisition_record_layout()));
}

#[test]
fn test_structural_equality_detects_renamed_field() {
    let a = CompoundType::builder()
        .primitive("stream", PrimitiveKind::U32)
        .primitive("index", PrimitiveKind::U32)
        .build();
    let b = CompoundType::builder()
        .primitive("stream", PrimitiveKind::U32)
        .primitive("offset", PrimitiveKind::U32)
        .build();
    assert_eq!(a, *index_entry_layout());
    assert_ne!(a, b);
    assert_ne!(b, *index_entry_layout());
}

#[test]
fn test_descriptor_json_roundtrip() {
    let json = serde_json::to_string(acquisition_record_layout()).unwrap();
    let parsed: TypeDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(&parsed, acquisition_record_layout());
}

#[test]
fn test_descriptor_display() {
    let text = index_entry_layout().to_string();
    assert_eq!(text, "{stream@0: u32, index@4: u32}");
    assert_eq!(xml_header_layout().to_string(), "vlen<str>");
}
