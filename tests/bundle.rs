//! End-to-end bundle assembly over a scratch build directory.

use std::fs;
use std::path::Path;

use central_portal_bundler::bundler::{Bundler, CollisionPolicy};
use central_portal_bundler::config::{Settings, SettingsBuilder};

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn settings(build: &Path) -> SettingsBuilder {
    SettingsBuilder::new()
        .group_id("com.example")
        .artifact_id("foo")
        .version("1.0.0")
        .build_dir(build)
}

fn archive_names(path: &Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

async fn bundle(settings: Settings) -> Vec<String> {
    let archive = Bundler::new(settings).bundle().await.unwrap();
    let names = archive_names(&archive.path);
    assert_eq!(names, archive.entries);
    names
}

#[tokio::test]
async fn single_variant_project_gives_nine_entries() {
    let dir = tempfile::tempdir().unwrap();
    let build = dir.path().join("build");
    write(&build.join("outputs/aar/foo.aar"), "aar");
    write(&build.join("libs/foo-sources.jar"), "sources");
    write(&build.join("publications/maven/foo.pom"), "<project/>");

    let names = bundle(settings(&build).build().unwrap()).await;

    let prefix = "com/example/foo/1.0.0/";
    let expected: Vec<String> = [
        "foo-1.0.0-sources.jar",
        "foo-1.0.0-sources.jar.md5",
        "foo-1.0.0-sources.jar.sha1",
        "foo-1.0.0.aar",
        "foo-1.0.0.aar.md5",
        "foo-1.0.0.aar.sha1",
        "foo-1.0.0.pom",
        "foo-1.0.0.pom.md5",
        "foo-1.0.0.pom.sha1",
    ]
    .iter()
    .map(|n| format!("{prefix}{n}"))
    .collect();
    assert_eq!(names, expected);
    assert!(build.join("central-portal-upload.zip").is_file());
}

#[tokio::test]
async fn debug_outputs_are_never_bundled() {
    let dir = tempfile::tempdir().unwrap();
    let build = dir.path().join("build");
    write(&build.join("outputs/aar/lib-debug.aar"), "debug");
    write(&build.join("outputs/aar/lib-release.aar"), "release");

    let settings = settings(&build).build().unwrap();
    let staging = settings.staging_dir().to_path_buf();
    let names = bundle(settings).await;

    assert_eq!(names.len(), 3);
    assert_eq!(
        fs::read_to_string(staging.join("foo-1.0.0.aar")).unwrap(),
        "release"
    );
}

#[tokio::test]
async fn signed_android_publication() {
    let dir = tempfile::tempdir().unwrap();
    let build = dir.path().join("build");
    for (path, contents) in [
        ("outputs/aar/publishTest-prod-release.aar", "aar"),
        ("outputs/aar/publishTest-prod-release.aar.asc", "sig"),
        ("outputs/aar/publishTest-dev-release.aar", "other flavor"),
        ("libs/publishTest-javadoc.jar", "doc"),
        ("libs/publishTest-javadoc.jar.asc", "sig"),
        ("libs/publishTest-sources.jar", "src"),
        ("libs/publishTest-sources.jar.asc", "sig"),
        ("publications/prodRelease/module.json", "{}"),
        ("publications/prodRelease/module.json.asc", "sig"),
        ("publications/prodRelease/pom-default.xml", "<project/>"),
        ("publications/prodRelease/pom-default.xml.asc", "sig"),
    ] {
        write(&build.join(path), contents);
    }

    let settings = settings(&build)
        .component_name("prodRelease")
        .publication_name("prodRelease")
        .build()
        .unwrap();
    let names = bundle(settings).await;

    // 5 artifacts with 2 checksums each, plus 5 signatures.
    assert_eq!(names.len(), 20);
    for signature in [
        "foo-1.0.0.aar.asc",
        "foo-1.0.0-javadoc.jar.asc",
        "foo-1.0.0-sources.jar.asc",
        "foo-1.0.0.module.asc",
        "foo-1.0.0.pom.asc",
    ] {
        let entry = format!("com/example/foo/1.0.0/{signature}");
        assert!(names.contains(&entry), "missing {entry}");
        assert!(!names.contains(&format!("{entry}.md5")));
    }
}

#[tokio::test]
async fn stale_staging_files_are_removed() {
    let dir = tempfile::tempdir().unwrap();
    let build = dir.path().join("build");
    write(&build.join("outputs/aar/foo.aar"), "aar");
    write(&build.join("central-portal-bundle/bar-0.9.aar"), "stale");

    let names = bundle(settings(&build).build().unwrap()).await;

    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|n| !n.contains("bar-0.9")));
}

#[tokio::test]
async fn colliding_descriptors_fail_unless_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let build = dir.path().join("build");
    write(&build.join("publications/maven/foo.pom"), "<a/>");
    write(&build.join("publications/maven/pom-default.xml"), "<b/>");

    let err = Bundler::new(settings(&build).build().unwrap())
        .bundle()
        .await
        .unwrap_err();
    assert!(err.is_collision());

    let names = bundle(
        settings(&build)
            .collision_policy(CollisionPolicy::Warn)
            .build()
            .unwrap(),
    )
    .await;
    assert_eq!(names.len(), 3);
}

#[tokio::test]
async fn empty_build_directory_gives_empty_archive() {
    let dir = tempfile::tempdir().unwrap();
    let names = bundle(settings(&dir.path().join("build")).build().unwrap()).await;
    assert!(names.is_empty());
}

#[test]
fn staging_over_the_build_directory_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let build = dir.path().join("build");
    write(&build.join("outputs/aar/foo.aar"), "aar");

    assert!(settings(&build).staging_dir(&build).build().is_err());
    assert!(
        settings(&build)
            .staging_dir(build.join("outputs"))
            .build()
            .is_err()
    );
    assert!(build.join("outputs/aar/foo.aar").is_file());
}
