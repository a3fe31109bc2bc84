use super::*;
use crate::schema::{index_entry_layout, PrimitiveKind, MRDSET_MIMETYPE};
use std::fs::File;
use std::io::{Read, Write};
use tempfile::tempdir;

fn u32_type() -> TypeDescriptor {
    TypeDescriptor::primitive(PrimitiveKind::U32)
}

fn u32_bytes(v: u32) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

#[test]
fn test_normalize_path() {
    assert_eq!(normalize_path("/dataset/data"), "/dataset/data");
    assert_eq!(normalize_path("dataset//data/"), "/dataset/data");
    assert_eq!(normalize_path(""), "/");
    assert_eq!(normalize_path("///"), "/");
}

#[test]
fn test_create_is_recognized_immediately() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("new.mrd");

    let file = Container::create(&path)?;
    assert!(is_recognized_format(&path));
    assert!(file.link_exists("/"));
    file.close()?;
    Ok(())
}

#[test]
fn test_mimetype_is_first_and_stored() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("layout.mrd");
    Container::create(&path)?.close()?;

    let mut archive = zip::ZipArchive::new(File::open(&path)?)?;
    let mut first = archive.by_index(0)?;
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), zip::CompressionMethod::Stored);
    let mut content = String::new();
    first.read_to_string(&mut content)?;
    assert_eq!(content, MRDSET_MIMETYPE);
    Ok(())
}

#[test]
fn test_foreign_file_is_not_recognized() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("plain.txt");
    File::create(&path)?.write_all(b"just some text")?;

    assert!(!is_recognized_format(&path));
    let err = Container::open(&path, AccessMode::ReadOnly).err().unwrap();
    assert!(matches!(err, ContainerError::NotAContainer(_)));
    Ok(())
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().unwrap();
    let err = Container::open(dir.path().join("missing.mrd"), AccessMode::ReadWrite)
        .err()
        .unwrap();
    assert!(matches!(err, ContainerError::NotFound(_)));
}

#[test]
fn test_group_requires_parent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut file = Container::create(dir.path().join("groups.mrd"))?;

    let err = file.create_group("/a/b").unwrap_err();
    assert!(matches!(err, ContainerError::NotFound(ref p) if p == "/a"));

    file.create_group("/a")?;
    file.create_group("/a/b")?;
    assert_eq!(file.node_kind("/a/b"), Some(NodeKind::Group));

    let err = file.create_group("/a").unwrap_err();
    assert!(matches!(err, ContainerError::AlreadyExists(_)));

    let err = file.create_group("/").unwrap_err();
    assert!(matches!(err, ContainerError::AlreadyExists(_)));
    Ok(())
}

#[test]
fn test_array_under_array_conflicts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut file = Container::create(dir.path().join("conflict.mrd"))?;
    file.create_array("/values", &u32_type(), &[1], &[None], &[1])?;

    let err = file.create_group("/values/sub").unwrap_err();
    assert!(matches!(err, ContainerError::PathConflict(_)));

    let err = file.open_array("/").unwrap_err();
    assert!(matches!(err, ContainerError::PathConflict(_)));
    Ok(())
}

#[test]
fn test_extend_and_hyperslab() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut file = Container::create(dir.path().join("slab.mrd"))?;
    let array = file.create_array("/values", &u32_type(), &[1, 1], &[None, Some(1)], &[1, 1])?;

    file.write_hyperslab(array, &[0, 0], &[1, 1], vec![u32_bytes(10)])?;
    file.extend_array(array, &[3, 1])?;
    file.write_hyperslab(array, &[1, 0], &[2, 1], vec![u32_bytes(11), u32_bytes(12)])?;

    assert_eq!(file.extent(array)?, &[3u64, 1][..]);
    let read = file.read_hyperslab(array, &[0, 0], &[3, 1])?;
    assert_eq!(read, vec![u32_bytes(10), u32_bytes(11), u32_bytes(12)]);
    Ok(())
}

#[test]
fn test_extend_rules() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut file = Container::create(dir.path().join("extend.mrd"))?;
    let array = file.create_array("/values", &u32_type(), &[2, 1], &[Some(4), Some(1)], &[1, 1])?;

    assert!(matches!(
        file.extend_array(array, &[5, 1]),
        Err(ContainerError::InvalidExtent(_))
    ));
    assert!(matches!(
        file.extend_array(array, &[1, 1]),
        Err(ContainerError::InvalidExtent(_))
    ));
    assert!(matches!(
        file.extend_array(array, &[3, 2]),
        Err(ContainerError::InvalidExtent(_))
    ));
    assert!(matches!(
        file.extend_array(array, &[3]),
        Err(ContainerError::InvalidExtent(_))
    ));
    file.extend_array(array, &[4, 1])?;
    Ok(())
}

#[test]
fn test_unwritten_elements_read_as_fill() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut file = Container::create(dir.path().join("fill.mrd"))?;
    let array = file.create_array("/values", &u32_type(), &[2], &[None], &[1])?;

    let read = file.read_hyperslab(array, &[1], &[1])?;
    assert_eq!(read, vec![vec![0u8; 4]]);
    Ok(())
}

#[test]
fn test_hyperslab_bounds_and_sizes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut file = Container::create(dir.path().join("bounds.mrd"))?;
    let array = file.create_array("/values", &u32_type(), &[1], &[None], &[1])?;

    assert!(matches!(
        file.read_hyperslab(array, &[1], &[1]),
        Err(ContainerError::OutOfBounds(_))
    ));
    assert!(matches!(
        file.write_hyperslab(array, &[0], &[1], vec![vec![1, 2]]),
        Err(ContainerError::ElementSize { expected: 4, actual: 2 })
    ));
    assert!(matches!(
        file.write_hyperslab(array, &[0], &[1], vec![]),
        Err(ContainerError::OutOfBounds(_))
    ));
    Ok(())
}

#[test]
fn test_persistence_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("persist.mrd");

    let id = {
        let mut file = Container::create(&path)?;
        file.create_group("/dataset")?;
        let dtype = index_entry_layout().clone();
        let array = file.create_array("/dataset/index", &dtype, &[1, 1], &[None, Some(1)], &[1, 1])?;
        file.write_hyperslab(array, &[0, 0], &[1, 1], vec![vec![1, 0, 0, 0, 2, 0, 0, 0]])?;
        file.extend_array(array, &[2, 1])?;
        let id = file.info().container_id;
        file.close()?;
        id
    };

    let file = Container::open(&path, AccessMode::ReadOnly)?;
    assert_eq!(file.info().container_id, id);
    assert_eq!(file.node_kind("/dataset"), Some(NodeKind::Group));
    let array = file.open_array("/dataset/index")?;
    assert_eq!(file.type_of(array)?, index_entry_layout());
    assert_eq!(file.extent(array)?, &[2u64, 1][..]);
    assert_eq!(file.max_extent(array)?, &[None, Some(1)][..]);
    assert_eq!(file.chunk(array)?, &[1u64, 1][..]);
    assert_eq!(file.array_path(array)?, "/dataset/index");

    let read = file.read_hyperslab(array, &[0, 0], &[2, 1])?;
    assert_eq!(read[0], vec![1, 0, 0, 0, 2, 0, 0, 0]);
    assert_eq!(read[1], vec![0u8; 8]);
    Ok(())
}

#[test]
fn test_drop_flushes_changes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("drop.mrd");
    {
        let mut file = Container::create(&path)?;
        file.create_group("/kept")?;
    }

    let file = Container::open(&path, AccessMode::ReadOnly)?;
    assert!(file.link_exists("/kept"));
    Ok(())
}

#[test]
fn test_read_only_rejects_mutation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("ro.mrd");
    Container::create(&path)?.close()?;

    let mut file = Container::open(&path, AccessMode::ReadOnly)?;
    assert!(matches!(file.create_group("/x"), Err(ContainerError::ReadOnly)));
    assert!(matches!(
        file.create_array("/x", &u32_type(), &[1], &[None], &[1]),
        Err(ContainerError::ReadOnly)
    ));
    Ok(())
}

#[test]
fn test_children() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut file = Container::create(dir.path().join("children.mrd"))?;
    file.create_group("/d")?;
    file.create_group("/d/data")?;
    file.create_array("/d/data/0", &u32_type(), &[1], &[None], &[1])?;
    file.create_array("/d/data/index", &u32_type(), &[1], &[None], &[1])?;
    file.create_group("/d/data/0x")?;

    let mut names = file.children("/d/data")?;
    names.sort();
    assert_eq!(names, vec!["0", "0x", "index"]);
    assert_eq!(file.children("/")?, vec!["d"]);
    assert!(matches!(file.children("/d/data/0"), Err(ContainerError::PathConflict(_))));
    Ok(())
}

#[test]
fn test_slab_positions_rank2() {
    let array = node::ArrayData {
        path: "/a".to_string(),
        dtype: u32_type(),
        extent: vec![3, 4],
        max_extent: vec![None, Some(4)],
        chunk: vec![1, 4],
        elements: vec![None; 12],
    };
    assert_eq!(array.slab_positions(&[1, 1], &[2, 2]), vec![5, 6, 9, 10]);
    assert_eq!(array.slab_positions(&[2, 0], &[1, 4]), vec![8, 9, 10, 11]);
    assert!(array.slab_positions(&[0, 0], &[0, 4]).is_empty());
}
