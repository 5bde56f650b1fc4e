//! Run controller tests: full runs against a mock site into a temp base directory.

use docs_scraper::{Mode, OutputMode, RoutineOutput, Sites};
use docs_scraper_cli::{execute, RunRequest, Settings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sites(server: &MockServer) -> Sites {
    Sites {
        main_doc_url: format!("{}/3/", server.uri()),
        pep_doc_url: format!("{}/peps/", server.uri()),
    }
}

async fn mount_peps(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/peps/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<section id="numerical-index"><table><tbody>
                 <tr><td><abbr title="t">IA</abbr></td><td><a href="pep-0001/">1</a></td></tr>
                 <tr><td><abbr title="t">SF</abbr></td><td><a href="pep-0008/">8</a></td></tr>
               </tbody></table></section>"#,
        ))
        .mount(server)
        .await;
    for (route, status) in [("/peps/pep-0001/", "Active"), ("/peps/pep-0008/", "Final")] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<section id="pep-content"><abbr title="s">{status}</abbr></section>"#
            )))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_file_output_writes_csv() {
    let server = MockServer::start().await;
    mount_peps(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::with_base_dir(dir.path());
    let request = RunRequest {
        mode: Mode::Pep,
        output: OutputMode::File,
        clear_cache: false,
    };

    let output = execute(&request, &settings, &sites(&server)).await.unwrap();
    assert!(matches!(output, RoutineOutput::Table(ref t) if t.len() == 3));

    let files: Vec<_> = std::fs::read_dir(settings.results_dir())
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("pep_") && name.ends_with(".csv"));
    assert_eq!(
        std::fs::read_to_string(&files[0]).unwrap(),
        "\"Status\",\"Quantity\"\n\"Active\",\"1\"\n\"Final\",\"1\"\n\"Total\",\"2\"\n"
    );
}

#[tokio::test]
async fn test_clear_cache_refetches() {
    let server = MockServer::start().await;
    mount_peps(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::with_base_dir(dir.path());
    let mut request = RunRequest {
        mode: Mode::Pep,
        output: OutputMode::Plain,
        clear_cache: false,
    };

    execute(&request, &settings, &sites(&server)).await.unwrap();
    let cached_after_first = std::fs::read_dir(settings.cache_dir()).unwrap().count();
    assert_eq!(cached_after_first, 3);

    // Second run is served entirely from the cache.
    server.reset().await;
    let output = execute(&request, &settings, &sites(&server)).await.unwrap();
    assert!(matches!(output, RoutineOutput::Table(_)));
    assert!(server.received_requests().await.unwrap().is_empty());

    // Clearing the cache sends every request to the network again.
    mount_peps(&server).await;
    request.clear_cache = true;
    let output = execute(&request, &settings, &sites(&server)).await.unwrap();
    assert!(matches!(output, RoutineOutput::Table(ref t) if t.header()[0] == "Status"));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_structural_error_escapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="sphinxsidebarwrapper"><ul><li>nothing here</li></ul></div>"#,
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::with_base_dir(dir.path());
    let request = RunRequest {
        mode: Mode::LatestVersions,
        output: OutputMode::Plain,
        clear_cache: false,
    };

    let err = execute(&request, &settings, &sites(&server)).await.unwrap_err();
    assert!(format!("{err:#}").contains("No list of Python versions found"));
}
