//! Shared helpers for suzuri-plugins integration tests
#![allow(dead_code)]

use bzip2::write::BzEncoder;
use bzip2::Compression;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Route tracing output through the test harness; safe to call from every
/// test, only the first call installs the subscriber
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Build an in-memory .tar.bz2 containing the given files
pub fn archive_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let encoder = BzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, *name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Descriptor JSON in the on-disk `<id>.json` format
pub fn descriptor_json(native_version: Option<&str>, data_version: &str, files: &[&str]) -> String {
    let file_list: Vec<String> = files.iter().map(|f| format!("\"{}\"", f)).collect();
    match native_version {
        Some(version) => format!(
            r#"{{"version": "{}", "data_version": "{}", "files": [{}]}}"#,
            version,
            data_version,
            file_list.join(", ")
        ),
        None => format!(
            r#"{{"data_version": "{}", "files": [{}]}}"#,
            data_version,
            file_list.join(", ")
        ),
    }
}

/// Serve `bytes` at `/<file_name>` on the mock server
pub async fn mock_file(server: &MockServer, file_name: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", file_name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
}

/// Serve `bytes` at `/<file_name>` and fail the test unless it is fetched
/// exactly `hits` times
pub async fn mock_file_expect(server: &MockServer, file_name: &str, bytes: Vec<u8>, hits: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", file_name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .expect(hits)
        .mount(server)
        .await;
}

/// Serve a failing status at `/<file_name>`
pub async fn mock_failing_file(server: &MockServer, file_name: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", file_name)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
