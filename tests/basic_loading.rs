//! Integration tests for resolving and loading bootstrap properties.

use catalina_properties::core::CONFIG_PROPERTY;
use catalina_properties::prelude::*;
use catalina_properties::sources::BundledSource;
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_conf(base: &Path, name: &str, content: &str) {
    let conf = base.join("conf");
    fs::create_dir_all(&conf).unwrap();
    fs::write(conf.join(name), content).unwrap();
}

fn loader_with(base: &Path, config_override: Option<&str>, sink: &MemorySink) -> ConfigLoader {
    ConfigLoader::builder()
        .with_base_dir(base)
        .with_config_override(config_override)
        .with_bundled_default(BundledSource::from_static("test", b"x=y\nsource=bundled\n"))
        .with_sink(sink.clone())
        .build()
}

#[test]
fn test_conventional_file_scenario() {
    let temp_dir = TempDir::new().unwrap();
    write_conf(temp_dir.path(), "catalina.properties", "foo=bar\n#comment\nbaz=1");
    let sink = MemorySink::new();

    let loaded = loader_with(temp_dir.path(), None, &sink).load().unwrap();

    assert_eq!(loaded.properties.get("foo"), Some("bar"));
    assert_eq!(loaded.properties.get("baz"), Some("1"));
    assert_eq!(loaded.properties.len(), 2);
    assert_eq!(sink.get("foo").as_deref(), Some("bar"));
    assert_eq!(sink.get("baz").as_deref(), Some("1"));
}

#[test]
fn test_override_url_wins_over_everything() {
    let temp_dir = TempDir::new().unwrap();
    write_conf(temp_dir.path(), "catalina.properties", "source=conventional\nonly.conventional=1");
    let override_path = temp_dir.path().join("elsewhere.properties");
    fs::write(&override_path, "source=override\nonly.override=1").unwrap();
    let url = url::Url::from_file_path(&override_path).unwrap();
    let sink = MemorySink::new();

    let loaded = loader_with(temp_dir.path(), Some(url.as_str()), &sink)
        .load()
        .unwrap();

    assert_eq!(loaded.origin, LoadOrigin::Override(url.to_string()));
    assert_eq!(loaded.properties.get("source"), Some("override"));
    assert_eq!(loaded.properties.get("only.override"), Some("1"));
    assert_eq!(loaded.properties.get("only.conventional"), None);
    assert_eq!(loaded.properties.get("x"), None);
}

#[test]
fn test_bare_name_override_is_resolved_under_conf() {
    let temp_dir = TempDir::new().unwrap();
    write_conf(temp_dir.path(), "catalina.properties", "source=default");
    write_conf(temp_dir.path(), "myfile.properties", "a=1");
    let sink = MemorySink::new();

    let loaded = loader_with(temp_dir.path(), Some("myfile.properties"), &sink)
        .load()
        .unwrap();

    assert_eq!(
        loaded.origin,
        LoadOrigin::ConventionalFile(temp_dir.path().join("conf").join("myfile.properties"))
    );
    assert_eq!(loaded.properties.get("a"), Some("1"));
    assert_eq!(loaded.properties.get("source"), None);
}

#[test]
fn test_override_with_separator_is_opened_as_url() {
    let temp_dir = TempDir::new().unwrap();
    // "conf/myfile.properties" contains a '/', so it is a (malformed) URL,
    // not a file name under conf/.
    write_conf(temp_dir.path(), "myfile.properties", "a=1");
    write_conf(temp_dir.path(), "catalina.properties", "source=default");
    let sink = MemorySink::new();

    let loaded = loader_with(temp_dir.path(), Some("conf/myfile.properties"), &sink)
        .load()
        .unwrap();

    assert_eq!(loaded.properties.get("a"), None);
    assert_eq!(loaded.properties.get("source"), Some("default"));
}

#[test]
fn test_unreachable_url_falls_back_to_bundled() {
    let temp_dir = TempDir::new().unwrap();
    let sink = MemorySink::new();

    let loader = ConfigLoader::builder()
        .with_base_dir(temp_dir.path())
        .with_config_override(Some("http://127.0.0.1:1/conf.properties"))
        .with_url_timeout(std::time::Duration::from_secs(2))
        .with_bundled_default(BundledSource::from_static("test", b"x=y"))
        .with_sink(sink.clone())
        .build();
    let loaded = loader.load().unwrap();

    assert_eq!(loaded.origin, LoadOrigin::Bundled);
    assert_eq!(loaded.properties.get("x"), Some("y"));
    assert_eq!(sink.get("x").as_deref(), Some("y"));
}

#[test]
fn test_graceful_total_failure() {
    let temp_dir = TempDir::new().unwrap();
    let sink = MemorySink::new();

    let loader = ConfigLoader::builder()
        .with_base_dir(temp_dir.path().join("does-not-exist"))
        .with_config_override(None::<String>)
        .without_bundled_default()
        .with_sink(sink.clone())
        .build();
    let loaded = loader.load().unwrap();

    assert!(loaded.properties.is_empty());
    assert_eq!(loaded.origin, LoadOrigin::Empty);
    assert_eq!(loaded.properties.get("foo"), None);
    assert!(sink.is_empty());
}

#[test]
fn test_builtin_default_resource() {
    let temp_dir = TempDir::new().unwrap();
    let sink = MemorySink::new();

    let loader = ConfigLoader::builder()
        .with_base_dir(temp_dir.path())
        .with_config_override(None::<String>)
        .with_sink(sink.clone())
        .build();
    let loaded = loader.load().unwrap();

    assert_eq!(loaded.origin, LoadOrigin::Bundled);
    assert!(loaded.properties.contains_key("common.loader"));
    assert_eq!(sink.len(), loaded.properties.len());
}

#[test]
fn test_every_entry_is_mirrored() {
    let temp_dir = TempDir::new().unwrap();
    write_conf(
        temp_dir.path(),
        "catalina.properties",
        "a=1\nb=\nc = spaced value\nlong=one,\\\n    two\n",
    );
    let sink = MemorySink::new();

    let loaded = loader_with(temp_dir.path(), None, &sink).load().unwrap();

    for (name, value) in &loaded.properties {
        assert_eq!(sink.get(name).as_deref(), Some(value), "mirror of {name}");
    }
    assert_eq!(sink.len(), 4);
    assert_eq!(sink.get("long").as_deref(), Some("one,two"));
}

#[test]
fn test_latin1_encoding() {
    let temp_dir = TempDir::new().unwrap();
    let conf = temp_dir.path().join("conf");
    fs::create_dir_all(&conf).unwrap();
    fs::write(conf.join("catalina.properties"), b"greeting=gr\xfc\xdf dich\n").unwrap();
    let sink = MemorySink::new();

    let loader = ConfigLoader::builder()
        .with_base_dir(temp_dir.path())
        .with_config_override(None::<String>)
        .with_encoding(Encoding::Latin1)
        .with_sink(sink.clone())
        .build();
    let loaded = loader.load().unwrap();

    assert_eq!(loaded.properties.get("greeting"), Some("grüß dich"));
}

#[test]
#[serial]
fn test_override_read_from_system_properties() {
    let temp_dir = TempDir::new().unwrap();
    write_conf(temp_dir.path(), "catalina.properties", "source=default");
    write_conf(temp_dir.path(), "node-a.properties", "source=node-a");
    SystemProperties::set_property(CONFIG_PROPERTY, "node-a.properties");
    let sink = MemorySink::new();

    let loader = ConfigLoader::builder()
        .with_base_dir(temp_dir.path())
        .with_sink(sink.clone())
        .build();
    let loaded = loader.load().unwrap();
    SystemProperties::clear_property(CONFIG_PROPERTY);

    assert_eq!(loaded.properties.get("source"), Some("node-a"));
}

#[test]
#[serial]
fn test_mirror_into_system_properties() {
    let temp_dir = TempDir::new().unwrap();
    write_conf(
        temp_dir.path(),
        "catalina.properties",
        "basic.loading.mirror.a=1\nbasic.loading.mirror.b=two",
    );

    let loader = ConfigLoader::builder()
        .with_base_dir(temp_dir.path())
        .with_config_override(None::<String>)
        .build();
    loader.load().unwrap();

    assert_eq!(
        SystemProperties::get_property("basic.loading.mirror.a").as_deref(),
        Some("1")
    );
    assert_eq!(
        SystemProperties::get_property("basic.loading.mirror.b").as_deref(),
        Some("two")
    );
    SystemProperties::clear_property("basic.loading.mirror.a");
    SystemProperties::clear_property("basic.loading.mirror.b");
}

#[test]
fn test_directory_override_url_falls_through() {
    let temp_dir = TempDir::new().unwrap();
    write_conf(temp_dir.path(), "catalina.properties", "source=conventional");
    let url = url::Url::from_directory_path(temp_dir.path()).unwrap();
    let sink = MemorySink::new();

    let loaded = loader_with(temp_dir.path(), Some(url.as_str()), &sink).load().unwrap();

    assert!(matches!(loaded.origin, LoadOrigin::ConventionalFile(_)));
    assert_eq!(loaded.properties.get("source"), Some("conventional"));
}

#[cfg(feature = "remote")]
mod remote {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one HTTP response on a loopback port and return its URL.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/conf/catalina.properties", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
        });

        (url, handle)
    }

    #[test]
    fn test_http_override() {
        let (url, server) = serve_once("200 OK", "source=http\nremote.only=yes\n");
        let temp_dir = TempDir::new().unwrap();
        write_conf(temp_dir.path(), "catalina.properties", "source=default");
        let sink = MemorySink::new();

        let loaded = loader_with(temp_dir.path(), Some(url.as_str()), &sink).load().unwrap();
        server.join().unwrap();

        assert_eq!(loaded.origin, LoadOrigin::Override(url));
        assert_eq!(loaded.properties.get("source"), Some("http"));
        assert_eq!(sink.get("remote.only").as_deref(), Some("yes"));
    }

    #[test]
    fn test_http_error_status_falls_through() {
        let (url, server) = serve_once("404 Not Found", "");
        let temp_dir = TempDir::new().unwrap();
        write_conf(temp_dir.path(), "catalina.properties", "source=default");
        let sink = MemorySink::new();

        let loaded = loader_with(temp_dir.path(), Some(url.as_str()), &sink).load().unwrap();
        server.join().unwrap();

        assert_eq!(loaded.properties.get("source"), Some("default"));
    }
    #[tokio::test(flavor = "multi_thread")]
    async fn test_http_override_from_async_context() {
        let (url, server) = serve_once("200 OK", "source=http\n");
        let temp_dir = TempDir::new().unwrap();
        let sink = MemorySink::new();

        let loaded = loader_with(temp_dir.path(), Some(url.as_str()), &sink).load().unwrap();
        server.join().unwrap();

        assert_eq!(loaded.origin, LoadOrigin::Override(url));
        assert_eq!(loaded.properties.get("source"), Some("http"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unreachable_override_in_async_context_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let sink = MemorySink::new();

        let loaded = loader_with(
            temp_dir.path(),
            Some("http://127.0.0.1:1/conf.properties"),
            &sink,
        )
        .load()
        .unwrap();

        assert_eq!(loaded.origin, LoadOrigin::Bundled);
        assert_eq!(loaded.properties.get("x"), Some("y"));
    }
}
