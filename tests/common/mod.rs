#![allow(dead_code)]

pub mod fixtures {
    use crdgen::pipeline::PipelineConfig;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    pub const BUCKET_CRD: &str = r#"apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: buckets.s3.aws.crossplane.io
spec:
  group: s3.aws.crossplane.io
  names:
    kind: Bucket
    plural: buckets
  versions:
    - name: v1beta1
      served: true
"#;

    /// Renders a definition and a composition from the config and CRD.
    pub const GENERATE_TEMPLATE: &str = r#"{% set cfg = config | fromjson %}{% set c = crd | fromjson %}
definition:
  apiVersion: apiextensions.crossplane.io/v1
  kind: CompositeResourceDefinition
  metadata:
    name: {{ cfg.plural if cfg.plural is defined else c.spec.names.plural }}.{{ cfg.group }}
  spec:
    group: {{ cfg.group }}
    names:
      kind: {{ cfg.name }}
    version: {{ cfg.version or c.spec.versions[0].name }}
composition:
  apiVersion: apiextensions.crossplane.io/v1
  kind: Composition
  metadata:
    name: {{ cfg.name | lower }}
  spec:
    sourceKind: {{ c.spec.names.kind }}
    overrides: {{ cfg.overrideFields | length }}
"#;

    /// A throwaway input tree plus a scripts directory.
    ///
    /// ```text
    /// <tmp>/
    ///   input/     (PipelineConfig::input_path)
    ///   functions/ (PipelineConfig::scripts_dir)
    /// ```
    pub struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir(dir.path().join("input")).unwrap();
            fs::create_dir(dir.path().join("functions")).unwrap();
            Self { dir }
        }

        /// Workspace with the bucket CRD at `input/crds/bucket.yaml` and the
        /// default `generate.j2` template installed.
        pub fn with_defaults() -> Self {
            let ws = Self::new();
            ws.add_file("input/crds/bucket.yaml", BUCKET_CRD);
            ws.add_script("generate.j2", GENERATE_TEMPLATE);
            ws
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn input(&self) -> PathBuf {
            self.root().join("input")
        }

        pub fn scripts(&self) -> PathBuf {
            self.root().join("functions")
        }

        /// Write `content` at `rel` (relative to the workspace root).
        pub fn add_file(&self, rel: &str, content: &str) -> PathBuf {
            let path = self.root().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            path
        }

        /// Write `input/<api_dir>/generate.yaml`.
        pub fn add_config(&self, api_dir: &str, yaml: &str) -> PathBuf {
            self.add_file(&format!("input/{api_dir}/generate.yaml"), yaml)
        }

        pub fn add_script(&self, name: &str, content: &str) -> PathBuf {
            self.add_file(&format!("functions/{name}"), content)
        }

        pub fn read(&self, rel: &str) -> String {
            fs::read_to_string(self.root().join(rel)).unwrap()
        }

        pub fn pipeline_config(&self) -> PipelineConfig {
            PipelineConfig::new(self.input(), self.scripts())
        }
    }

    /// A minimal config for `kind` pointing at the bundled bucket CRD.
    pub fn bucket_config(kind: &str) -> String {
        format!(
            "group: storage.example.org\nname: {kind}\ncrd: crds/bucket.yaml\nversion: v1alpha1\n"
        )
    }
}

pub mod mock_http {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// Serve `body` with `status` (e.g. `"200 OK"`) to every request.
    ///
    /// Returns the base URL and a counter of requests served.
    pub fn start_mock_server(status: &'static str, body: String) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let url = format!("http://127.0.0.1:{}", addr.port());
        let hits = Arc::new(AtomicUsize::new(0));

        let served = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(mut stream) => {
                        let mut buf = [0u8; 2048];
                        if stream.read(&mut buf).is_ok() {
                            served.fetch_add(1, Ordering::SeqCst);
                            let resp = format!(
                                "HTTP/1.1 {}\r\nContent-Type: application/yaml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                status,
                                body.len(),
                                body
                            );
                            let _ = stream.write_all(resp.as_bytes());
                            let _ = stream.flush();
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        thread::sleep(Duration::from_millis(150));
        (url, hits)
    }
}
