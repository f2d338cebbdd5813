//! Integration tests for the asset analysis pipeline
//!
//! These tests build small asset trees on disk and check the written reports.

use assetsweep::analysis::{analyze_size, analyze_unused, Analyzer};
use assetsweep::config::Config;
use assetsweep::discovery::{ResourceKind, TreeWalker};
use std::fs;
use std::path::{Path, PathBuf};

const U1: &str = "5b8f1c2a-3d4e-4f60-a7b8-9c0d1e2f3a4b";

fn write(root: &Path, rel: &str, contents: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn meta(uuid: &str) -> Vec<u8> {
    format!(r#"{{ "ver": "2.3.5", "uuid": "{}", "subMetas": {{}} }}"#, uuid).into_bytes()
}

/// Create a project root plus a separate directory for reports
fn project() -> (tempfile::TempDir, tempfile::TempDir) {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    (root, out)
}

fn unreferenced_section(report: &str) -> &str {
    let start = report.find("--- 未引用文件 ---").expect("missing section");
    let end = report.find("--- 非动态加载").expect("missing section");
    &report[start..end]
}

// ============================================================================
// Unused-asset scenarios
// ============================================================================

#[test]
fn test_scene_reference_binds_image_and_removal_unbinds_it() {
    let (root, out) = project();
    let image = write(root.path(), "a.png", &[7u8; 1234]);
    write(root.path(), "a.png.meta", br#"{ "uuid": "U1" }"#);
    let scene = write(root.path(), "scene.fire", b"[{ \"__uuid__\": \"U1\" }]");
    let dest = out.path().join("unused.txt");

    let report = analyze_unused(root.path(), &dest, false, None).unwrap();
    assert_eq!(report.unbound.total_count, 0);
    let text = fs::read_to_string(&dest).unwrap();
    assert!(text.starts_with("\n--- 未引用文件 ---\n总数: 0, 总空间: 0.0000 MB\n"));

    // Drop the reference and run again
    fs::write(&scene, b"[]").unwrap();
    let report = analyze_unused(root.path(), &dest, false, None).unwrap();

    assert_eq!(report.unbound.total_count, 1);
    assert_eq!(report.unbound.total_size_bytes, 1234);
    assert_eq!(report.unbound.groups[0].key, ResourceKind::Image);

    let text = fs::read_to_string(&dest).unwrap();
    let section = unreferenced_section(&text);
    assert!(section.contains("总数: 1, 总空间: 0.0012 MB"));
    let canonical = fs::canonicalize(&image).unwrap();
    assert!(section.contains(&format!("空间: 1.21 KB, 文件: {}", canonical.display())));
}

#[test]
fn test_code_prefab_and_scene_all_count_as_references() {
    let (root, out) = project();
    write(root.path(), "from_code.png", b"x");
    write(root.path(), "from_code.png.meta", &meta("C0DE0000-0000-4000-8000-000000000001"));
    write(root.path(), "from_prefab.png", b"x");
    write(root.path(), "from_prefab.png.meta", &meta("PREFAB-REF"));
    write(root.path(), "script/Game.ts", b"const id = 'C0DE0000-0000-4000-8000-000000000001';");
    write(root.path(), "prefab/Hero.prefab", b"{\"__uuid__\": \"PREFAB-REF\"}");
    write(root.path(), "prefab/Hero.prefab.meta", &meta(U1));
    write(root.path(), "main.fire", format!("{{\"__uuid__\": \"{}\"}}", U1).as_bytes());

    let report = analyze_unused(root.path(), &out.path().join("r.txt"), false, None).unwrap();

    assert_eq!(report.bound_count, 3);
    assert!(report.unbound.is_empty());
    assert!(report.no_metadata.is_empty());
}

#[test]
fn test_unreferenced_prefab_is_reported() {
    let (root, out) = project();
    write(root.path(), "prefab/Orphan.prefab", b"{\"_name\": \"Orphan\"}");
    write(root.path(), "prefab/Orphan.prefab.meta", &meta("ORPHAN-PREFAB"));
    write(root.path(), "main.fire", b"{}");

    let report = analyze_unused(root.path(), &out.path().join("r.txt"), false, None).unwrap();

    assert_eq!(report.unbound.total_count, 1);
    assert_eq!(report.unbound.groups[0].key, ResourceKind::Prefab);
}

#[test]
fn test_atlas_sub_identity_binds_parent() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "ui/icons.png", b"x");
    write(root.path(), "ui/icons.plist", b"<plist/>");
    write(
        root.path(),
        "ui/icons.plist.meta",
        br#"{ "uuid": "ATLAS", "subMetas": {
              "coin.png": { "uuid": "FRAME-COIN" },
              "gem.png": { "uuid": "FRAME-GEM" } } }"#,
    );
    write(root.path(), "shop.fire", b"{\"_spriteFrame\": {\"__uuid__\": \"FRAME-GEM\"}}");

    let config = Config::default();
    let report = Analyzer::new(&config).find_unused(root.path(), None).unwrap();

    // The atlas is bound through one frame; the png has no metadata
    let unbound_kinds: Vec<_> = report.unbound.groups.iter().map(|g| g.key).collect();
    assert!(!unbound_kinds.contains(&ResourceKind::ImageAtlas));
    assert_eq!(report.no_metadata.total_count, 1);
}

#[test]
fn test_assets_without_metadata_are_reported_separately() {
    let (root, out) = project();
    write(root.path(), "nometa.png", b"abc");
    write(root.path(), "broken.png", b"abcd");
    write(root.path(), "broken.png.meta", b"{ this is not json");
    write(root.path(), "main.fire", b"{}");
    let dest = out.path().join("r.txt");

    let report = analyze_unused(root.path(), &dest, false, None).unwrap();

    assert_eq!(report.unbound.total_count, 0);
    assert_eq!(report.no_metadata.total_count, 2);
    assert_eq!(report.no_metadata.total_size_bytes, 7);

    let text = fs::read_to_string(&dest).unwrap();
    assert!(text.contains("--- 无元数据(无法判定引用)的文件 ---\n总数: 2"));
}

#[test]
fn test_resources_assets_not_loaded_from_code() {
    let (root, out) = project();
    write(root.path(), "resources/ui/loaded.png", &[0u8; 2048]);
    write(root.path(), "resources/ui/loaded.png.meta", &meta("LOADED"));
    write(root.path(), "resources/ui/static.png", &[0u8; 1024]);
    write(root.path(), "resources/ui/static.png.meta", &meta("STATIC"));
    write(root.path(), "main.fire", b"LOADED STATIC");
    write(root.path(), "Game.js", b"cc.resources.load('ui/loaded', cc.SpriteFrame, cb);");
    let dest = out.path().join("r.txt");

    let report = analyze_unused(root.path(), &dest, false, None).unwrap();

    assert_eq!(report.unbound.total_count, 0);
    assert_eq!(report.not_dynamically_loaded.total_count, 1);
    let flagged: Vec<_> = report.not_dynamically_loaded.files().collect();
    assert!(flagged[0].path.ends_with("resources/ui/static.png"));

    let text = fs::read_to_string(&dest).unwrap();
    assert!(text.contains("--- 非动态加载(可移出resources)的文件 ---\n总数: 1, 总空间: 0.0010 MB"));
}

#[test]
fn test_scene_inside_temp_directory_still_references() {
    let (root, out) = project();
    write(root.path(), "a.png", b"x");
    write(root.path(), "a.png.meta", br#"{ "uuid": "U1" }"#);
    write(root.path(), "temp/level.fire", b"[{ \"__uuid__\": \"U1\" }]");
    write(root.path(), "library/b.png", b"y");
    write(root.path(), "library/b.png.meta", br#"{ "uuid": "U2" }"#);

    let report = analyze_unused(root.path(), &out.path().join("r.txt"), false, None).unwrap();

    assert_eq!(report.bound_count, 1);
    assert_eq!(report.unbound.total_count, 1);
    let unbound: Vec<_> = report.unbound.files().collect();
    assert!(unbound[0].path.ends_with("library/b.png"));
}

#[test]
fn test_resources_folder_above_root_is_ignored() {
    let base = tempfile::tempdir().unwrap();
    let root = base.path().join("resources").join("game");
    write(&root, "textures/bg.png", &[0u8; 64]);
    write(&root, "textures/bg.png.meta", &meta(U1));
    write(&root, "main.fire", format!("{{\"__uuid__\": \"{}\"}}", U1).as_bytes());
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("r.txt");

    let report = analyze_unused(&root, &dest, false, None).unwrap();

    assert_eq!(report.bound_count, 1);
    assert!(report.not_dynamically_loaded.is_empty());
    let text = fs::read_to_string(&dest).unwrap();
    assert!(text.contains("--- 非动态加载(可移出resources)的文件 ---\n总数: 0, 总空间: 0.0000 MB\n"));
    assert!(!text.contains("bg.png"));
}

#[test]
fn test_unused_report_is_idempotent() {
    let (root, out) = project();
    for i in 0..10 {
        write(root.path(), &format!("img/{}.png", i), &vec![0u8; 100 * (i % 3) + 1]);
        write(root.path(), &format!("img/{}.png.meta", i), &meta(&format!("ID-{}", i)));
    }
    write(root.path(), "main.fire", b"ID-1 ID-4");
    let first = out.path().join("first.txt");
    let second = out.path().join("second.txt");

    analyze_unused(root.path(), &first, false, None).unwrap();
    analyze_unused(root.path(), &second, false, None).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_parallel_and_sequential_reports_match() {
    let (root, out) = project();
    for i in 0..30 {
        write(root.path(), &format!("a/{:02}.png", i), &vec![1u8; i + 1]);
        write(root.path(), &format!("a/{:02}.png.meta", i), &meta(&format!("P-{:02}", i)));
        if i % 4 == 0 {
            write(root.path(), &format!("s/{:02}.prefab", i), format!("P-{:02}", i).as_bytes());
        }
    }

    let sequential = Config::default();
    let parallel = Config {
        parallel: true,
        ..Config::default()
    };
    let a = out.path().join("a.txt");
    let b = out.path().join("b.txt");
    Analyzer::new(&sequential).analyze_unused(root.path(), &a, false, None).unwrap();
    Analyzer::new(&parallel).analyze_unused(root.path(), &b, false, None).unwrap();

    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn test_each_file_lands_in_at_most_one_role() {
    let (root, _out) = project();
    write(root.path(), "a.png", b"x");
    write(root.path(), "a.png.meta", b"{}");
    write(root.path(), "b.ts", b"x");
    write(root.path(), "c.fire", b"x");
    write(root.path(), "d.prefab", b"x");
    write(root.path(), "e.txt", b"x");

    let config = Config::default();
    let output = TreeWalker::new(&config).walk(root.path()).unwrap();

    let assets: Vec<_> = output.assets.iter().map(|a| a.path.clone()).collect();
    let blobs: Vec<_> = output.blobs.iter().map(|b| b.path.clone()).collect();

    // Only prefabs are both a candidate and a reference source
    for path in &assets {
        if blobs.contains(path) {
            assert!(path.ends_with("d.prefab"));
        }
    }
    assert_eq!(assets.len(), 2);
    assert_eq!(blobs.len(), 3);
}

// ============================================================================
// Size scenarios
// ============================================================================

#[test]
fn test_size_report_orders_by_size() {
    let (root, out) = project();
    write(root.path(), "big.png", &vec![0u8; 10_000_000]);
    write(root.path(), "small.png", &vec![0u8; 1_000]);
    let dest = out.path().join("size.txt");

    let report = analyze_size(root.path(), &dest).unwrap();
    assert_eq!(report.result.total_size_bytes, 10_001_000);

    let text = fs::read_to_string(&dest).unwrap();
    let canonical_root = fs::canonicalize(root.path()).unwrap();
    assert!(text.starts_with(&format!(
        "总空间: 9.5377 MB, 目录: {}\n\n类型: .png, 个数: 2, 占用空间: 9.5377 MB\n",
        canonical_root.display()
    )));

    let big = text.find("big.png").unwrap();
    let small = text.find("small.png").unwrap();
    assert!(big < small);
    assert!(text.contains("空间: 9765.62 KB") || text.contains("空间: 9765.63 KB"));
    assert!(text.contains("空间: 0.98 KB"));
}

#[test]
fn test_size_totals_per_extension() {
    let (root, out) = project();
    write(root.path(), "a.png", &[0u8; 300]);
    write(root.path(), "a.png.meta", &[0u8; 50]);
    write(root.path(), "sub/b.png", &[0u8; 200]);
    write(root.path(), "sub/c.json", &[0u8; 1000]);
    write(root.path(), "LICENSE", &[0u8; 7]);

    let report = analyze_size(root.path(), &out.path().join("size.txt")).unwrap();

    let totals: Vec<(String, u64)> = report
        .result
        .groups
        .iter()
        .map(|g| (g.key.clone(), g.total_size_bytes))
        .collect();
    assert_eq!(
        totals,
        vec![
            (".json".to_string(), 1000),
            (".png".to_string(), 500),
            (".meta".to_string(), 50),
            ("no_extension".to_string(), 7),
        ]
    );
    assert_eq!(report.result.total_size_bytes, 1557);
}

#[test]
fn test_size_counts_files_in_temp_and_library_directories() {
    let (root, out) = project();
    write(root.path(), "textures/temp/big.png", &[0u8; 4096]);
    write(root.path(), "library/cache.png", &[0u8; 10]);
    write(root.path(), "small.png", &[0u8; 100]);

    let report = analyze_size(root.path(), &out.path().join("size.txt")).unwrap();

    assert_eq!(report.result.total_count, 3);
    assert_eq!(report.result.total_size_bytes, 4206);
}

#[test]
fn test_missing_source_dir_is_fatal_and_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("r.txt");

    assert!(analyze_size(&out.path().join("nope"), &dest).is_err());
    assert!(analyze_unused(&out.path().join("nope"), &dest, false, None).is_err());
    assert!(!dest.exists());
}
