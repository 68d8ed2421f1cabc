//! Script containers and format revisions loaded from disk

use std::path::PathBuf;

use sota_rs::prelude::*;

use crate::{polygon, script_from_frames};

fn scratch_file(name: &str) -> PathBuf {
	let dir = std::env::temp_dir().join(format!("sota-rs-tests-{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	dir.join(name)
}

fn sample() -> Script {
	script_from_frames(&[
		vec![polygon(0xD2, &[(0, 0), (0, 10), (10, 0)])],
		vec![polygon(0xD3, &[(1, 1), (1, 5), (5, 5)]), polygon(0xD5, &[(2, 2), (9, 9), (2, 9)])],
	])
}

#[test]
fn json_file_round_trip() {
	let script = sample();
	let path = scratch_file("sample.json");
	std::fs::write(&path, script.to_json_string().unwrap()).unwrap();

	let loaded = Script::open(&path).unwrap();
	assert_eq!(loaded, script);
}

#[test]
fn packed_file_round_trip() {
	let script = sample();
	let path = scratch_file("sample.bin");
	std::fs::write(&path, script.to_packed().unwrap()).unwrap();

	let loaded = Script::open(&path).unwrap();
	assert_eq!(loaded, script);
	assert_eq!(loaded.frame_count(), 2);
}

#[test]
fn packed_header_is_big_endian() {
	let packed = sample().to_packed().unwrap();
	assert_eq!(hex::encode(&packed[..6]), "000200000009");
}

#[test]
fn split_index_and_data() {
	let script = sample();
	let table: Vec<u8> = script.indices().iter().flat_map(|&o| (o as u16).to_be_bytes()).collect();
	let (index_table, data) = script.to_split().unwrap();
	assert_eq!(index_table, table);
	let rebuilt = Script::from_split(&table, data).unwrap();
	assert_eq!(rebuilt, script);
}

#[test]
fn split_files_open_from_index_path() {
	let script = sample();
	let (index_table, data) = script.to_split().unwrap();

	let index_path = scratch_file("sample.idx");
	std::fs::write(&index_path, &index_table).unwrap();
	std::fs::write(scratch_file("sample.dat"), &data).unwrap();
	assert_eq!(Script::open(&index_path).unwrap(), script);

	let index_path = scratch_file("sample_index.bin");
	std::fs::write(&index_path, &index_table).unwrap();
	std::fs::write(scratch_file("sample_anim.bin"), &data).unwrap();
	assert_eq!(Script::open(&index_path).unwrap(), script);
}

#[test]
fn split_index_without_data_is_io_error() {
	let index_path = scratch_file("orphan.idx");
	std::fs::write(&index_path, [0, 0]).unwrap();
	assert!(matches!(Script::open(&index_path), Err(SotaError::Io(_))));
}

#[test]
fn missing_file_is_io_error() {
	assert!(matches!(Script::open(scratch_file("missing.json")), Err(SotaError::Io(_))));
}

#[test]
fn revision_from_json_config() {
	let json = r#"{
		"name": "two-plane",
		"plane_count": 2,
		"polygon_base": 208,
		"plane_map": [0, 0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1],
		"tweens": [{ "command": 230, "plane": 1 }],
		"unknown": { "policy": "abort" },
		"max_draws_per_frame": 6
	}"#;
	let revision: FormatRevision = serde_json::from_str(json).unwrap();
	revision.validate().unwrap();
	assert_eq!(revision.classify(0xD3), CommandKind::Polygon { plane: 1 });
	assert_eq!(revision.classify(0xE6), CommandKind::Tween { plane: 1 });
	assert_eq!(revision.classify(0xF2), CommandKind::Unknown);
	assert!(revision.ignored.is_empty());

	let mut renderer = Renderer::new(sample(), revision, 16, 16).unwrap();
	let report = renderer.render_frame(1).unwrap();
	assert_eq!(report.touched.bits(), 0b10);
}

#[test_log::test]
fn unknown_command_policies() {
	let data = vec![2, 0x42, 1, 2, 3, 4, 5, 6, 0xD2, 0];
	let script = Script::new(vec![0], data).unwrap();

	let skipping = FormatRevision::four_plane();
	let (ops, end) = script.decode_frame(0, &skipping).unwrap();
	assert_eq!(ops.len(), 2);
	assert_eq!(ops[0].command(), 0x42);
	assert_eq!(end, 10);

	let mut aborting = FormatRevision::four_plane();
	aborting.unknown = UnknownPolicy::Abort;
	let mut renderer = Renderer::new(script, aborting, 8, 8).unwrap();
	let report = renderer.render_frame(0).unwrap();
	assert!(matches!(
		report.fault,
		Some(SotaError::UnknownCommand {
			offset: 1,
			command: 0x42
		})
	));
	assert_eq!(report.drawn, 0);
}
