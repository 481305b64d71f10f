//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the advisory site, its forum and
//! the vulnerability database, and drive the real HTTP fetcher end-to-end.

use advisory_harvest::config::Config;
use advisory_harvest::crawler::{CommentCollector, Coordinator, EnrichmentClient, HttpFetcher};
use advisory_harvest::output::{format_records, JsonFileStore, ResultStore};
use advisory_harvest::state::StopReason;
use advisory_harvest::url::SiteLinks;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_A: &str = "/news/Alpha-Luecke-1001.html";
const ARTICLE_B: &str = "/news/Beta-Luecke-1002.html";

/// Creates a configuration pointing every URL at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.vuln_db.base_url = base_url.to_string();
    config.crawler.request_timeout_secs = 5;
    config
}

fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-08-01T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

fn days_ago(days: i64) -> String {
    (fixed_now() - Duration::days(days)).to_rfc3339()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn article_html(published: &str, extra: &str) -> String {
    format!(
        r#"<div class="creator">
                Von
                Jane Doe
            </div>
            <time datetime="{}">Datum</time>
            {}"#,
        published, extra
    )
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mounts the index with article A (recent, one CVE, one comment) and
/// article B (120 days old)
async fn mount_site(server: &MockServer) {
    mount_get(
        server,
        "/security/alerts/seite-1",
        html(&format!(
            r#"<a href="/security/news/">Security</a>
               <a href="{a}">Alpha</a>
               <a href="{a}">Alpha (teaser)</a>
               <a href="{b}">Beta</a>
               <a href="/security/news/archiv/">Archiv</a>"#,
            a = ARTICLE_A,
            b = ARTICLE_B
        )),
    )
    .await;

    // Pagination must halt after B
    Mock::given(method("GET"))
        .and(path("/security/alerts/seite-2"))
        .respond_with(html(""))
        .expect(0)
        .mount(server)
        .await;

    mount_get(
        server,
        &format!("/security/alerts{}", ARTICLE_A),
        html(&article_html(
            &days_ago(2),
            r#"<span class="a-publish-info__update">Update</span>
               <p>Die Luecke CVE-2024-1111 (auch cve-2024-1111) ist kritisch.</p>
               <a href="/Alpha-Luecke-1001/comment/">Kommentare</a>
               <a href="/Alpha-Luecke-1001/comment/">Kommentare</a>"#,
        )),
    )
    .await;

    mount_get(
        server,
        &format!("/security/alerts{}", ARTICLE_B),
        html(&article_html(&days_ago(120), "<p>Keine CVEs.</p>")),
    )
    .await;

    mount_get(
        server,
        "/vuln/detail/CVE-2024-1111",
        html(
            r#"<a id="Cvss3CnaCalculatorAnchor">9.8 CRITICAL</a>
               <span data-testid="vuln-published-on">07/25/2024</span>"#,
        ),
    )
    .await;

    mount_get(
        server,
        "/forum/heise-online/Kommentare/Alpha-Luecke-1001/comment/",
        html(
            r#"<a href="/forum/heise-online/Kommentare/Alpha-Luecke/Danke/posting-501/">Danke</a>
               <a href="/forum/heise-online/Kommentare/Alpha-Luecke/chronological/">Chronologisch</a>"#,
        ),
    )
    .await;

    mount_get(
        server,
        "/forum/heise-online/Kommentare/Alpha-Luecke/Danke/posting-501/",
        html(
            r#"<div id="posting_501">
                  Danke fuer den Hinweis!

                  Gleich gepatcht.
                  Melden
                  Antworten
               </div>"#,
        ),
    )
    .await;
}

#[tokio::test]
async fn test_end_to_end_recent_article_only() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let config = create_test_config(&mock_server.uri());
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_now(fixed_now());
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(
        record.url,
        format!("{}/security/alerts{}", mock_server.uri(), ARTICLE_A)
    );
    assert_eq!(record.author, "Jane Doe");
    assert_eq!(record.title, "Alpha Luecke");
    assert_eq!(record.published_at.to_rfc3339(), days_ago(2));
    assert!(record.has_update_marker);

    assert_eq!(record.identifiers.len(), 1);
    let identifier = &record.identifiers[0];
    assert_eq!(identifier.id, "CVE-2024-1111");
    assert_eq!(identifier.severity_score.as_deref(), Some("9.8 CRITICAL"));
    assert_eq!(
        identifier.published_at,
        NaiveDate::from_ymd_opt(2024, 7, 25).and_then(|d| d.and_hms_opt(0, 0, 0))
    );

    assert_eq!(
        record.comments,
        vec!["Danke fuer den Hinweis!\nGleich gepatcht.".to_string()]
    );

    assert_eq!(outcome.summary.articles_recorded, 1);
    assert_eq!(outcome.summary.pages_visited, 1);
    assert!(matches!(
        outcome.summary.stop_reason,
        Some(StopReason::OutOfWindow { ref url }) if url.ends_with(ARTICLE_B)
    ));

    // The store receives a one-element collection
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let results_path = dir.path().join("results.json");
    let store = JsonFileStore::new(&results_path);
    store.write(&outcome.records).expect("Failed to write results");

    let content = std::fs::read_to_string(&results_path).expect("Failed to read results");
    let value: serde_json::Value = serde_json::from_str(&content).expect("Invalid JSON");
    let array = value.as_array().expect("Results are an array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["title"], "Alpha Luecke");
    assert_eq!(array[0]["cves"][0]["cve"], "CVE-2024-1111");
    assert_eq!(array[0]["cves"][0]["published"], "2024-07-25T00:00:00");
    assert_eq!(array[0]["updated"], true);

    // Wiremock verifies that page 2 was never requested when the server drops
}

#[tokio::test]
async fn test_rerun_produces_identical_output() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let config = create_test_config(&mock_server.uri());
        let coordinator = Coordinator::new(config)
            .expect("Failed to create coordinator")
            .with_now(fixed_now());
        let outcome = coordinator.run().await.expect("Crawl failed");
        outputs.push(format_records(&outcome.records).expect("Failed to format"));
    }

    assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn test_output_urls_unique_and_recent() {
    let mock_server = MockServer::start().await;

    // The same articles appear on two pages; C is out of window on page 2
    let page = |extra: &str| {
        html(&format!(
            r#"<a href="/news/Eins-1.html">1</a><a href="/news/Zwei-2.html">2</a>{}"#,
            extra
        ))
    };
    mount_get(&mock_server, "/security/alerts/seite-1", page("")).await;
    mount_get(
        &mock_server,
        "/security/alerts/seite-2",
        page(r#"<a href="/news/Drei-3.html">3</a><a href="/news/Vier-4.html">4</a>"#),
    )
    .await;
    mount_get(
        &mock_server,
        "/security/alerts/news/Eins-1.html",
        html(&article_html(&days_ago(1), "")),
    )
    .await;
    mount_get(
        &mock_server,
        "/security/alerts/news/Zwei-2.html",
        html(&article_html(&days_ago(5), "")),
    )
    .await;
    mount_get(
        &mock_server,
        "/security/alerts/news/Drei-3.html",
        html(&article_html(&days_ago(95), "")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/security/alerts/news/Vier-4.html"))
        .respond_with(html(&article_html(&days_ago(10), "")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let window = config.crawler.recency_days;
    let outcome = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_now(fixed_now())
        .run()
        .await
        .expect("Crawl failed");

    let urls: HashSet<&str> = outcome.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls.len(), outcome.records.len());
    assert_eq!(outcome.records.len(), 2);
    for record in &outcome.records {
        assert!(fixed_now().signed_duration_since(record.published_at) <= Duration::days(window.into()));
    }
    assert_eq!(outcome.summary.pages_visited, 2);
}

#[tokio::test]
async fn test_enrichment_not_found_is_absent() {
    let mock_server = MockServer::start().await;

    // No record: the database answers with a page lacking the score elements
    mount_get(
        &mock_server,
        "/vuln/detail/CVE-2024-2222",
        html("<p>CVE ID Not Found</p>"),
    )
    .await;
    // Transport failure
    Mock::given(method("GET"))
        .and(path("/vuln/detail/CVE-2024-3333"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let links = SiteLinks::new(&config.site, &config.vuln_db);
    let fetcher = HttpFetcher::from_config(&config.user_agent, 5).expect("Failed to build client");
    let client = EnrichmentClient::new(&fetcher, &links, 2);

    let records = client
        .enrich_all(&["CVE-2024-2222".to_string(), "CVE-2024-3333".to_string()])
        .await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "CVE-2024-2222");
    assert_eq!(records[1].id, "CVE-2024-3333");
    for record in &records {
        assert_eq!(record.severity_score, None);
        assert_eq!(record.published_at, None);
    }
}

#[tokio::test]
async fn test_comment_collector_skips_chronological_view() {
    let mock_server = MockServer::start().await;

    mount_get(
        &mock_server,
        "/forum/heise-online/Kommentare/Patchday-Adobe/comment/",
        html(
            r#"<a href="/forum/heise-online/Kommentare/Patchday-Adobe/Erster/posting-11/">1</a>
               <a href="/forum/heise-online/Kommentare/Patchday-Adobe/chronological/">chrono</a>
               <a href="/forum/heise-online/Kommentare/Patchday-Adobe/Zweiter/posting-12/">2</a>"#,
        ),
    )
    .await;
    mount_get(
        &mock_server,
        "/forum/heise-online/Kommentare/Patchday-Adobe/Erster/posting-11/",
        html(r#"<div id="posting_11">Erster Kommentar<br>Melden</div>"#),
    )
    .await;
    mount_get(
        &mock_server,
        "/forum/heise-online/Kommentare/Patchday-Adobe/Zweiter/posting-12/",
        html(
            r#"<div id="posting_12">
                 Zweiter
                 Kommentar
                 Melden
               </div>"#,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/forum/heise-online/Kommentare/Patchday-Adobe/chronological/"))
        .respond_with(html(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let links = SiteLinks::new(&config.site, &config.vuln_db);
    let fetcher = HttpFetcher::from_config(&config.user_agent, 5).expect("Failed to build client");
    let collector = CommentCollector::new(&fetcher, &links, "Melden", 2);

    let comments = collector
        .collect("/Patchday-Adobe/comment/", "Patchday Adobe")
        .await;

    assert_eq!(
        comments,
        vec!["Erster Kommentar".to_string(), "Zweiter\nKommentar".to_string()]
    );
}

#[tokio::test]
async fn test_comment_without_footer_is_dropped() {
    let mock_server = MockServer::start().await;

    mount_get(
        &mock_server,
        "/forum/heise-online/Kommentare/Patchday-Adobe/comment/",
        html(
            r#"<a href="/forum/heise-online/Kommentare/Patchday-Adobe/Ok/posting-21/">ok</a>
               <a href="/forum/heise-online/Kommentare/Patchday-Adobe/Kaputt/posting-22/">kaputt</a>
               <a href="/forum/heise-online/Kommentare/Patchday-Adobe/Weg/posting-23/">weg</a>"#,
        ),
    )
    .await;
    mount_get(
        &mock_server,
        "/forum/heise-online/Kommentare/Patchday-Adobe/Ok/posting-21/",
        html(r#"<div id="posting_21">Passt Melden</div>"#),
    )
    .await;
    // Marker missing
    mount_get(
        &mock_server,
        "/forum/heise-online/Kommentare/Patchday-Adobe/Kaputt/posting-22/",
        html(r#"<div id="posting_22">Ohne Footer</div>"#),
    )
    .await;
    // Posting deleted
    Mock::given(method("GET"))
        .and(path("/forum/heise-online/Kommentare/Patchday-Adobe/Weg/posting-23/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let links = SiteLinks::new(&config.site, &config.vuln_db);
    let fetcher = HttpFetcher::from_config(&config.user_agent, 5).expect("Failed to build client");
    let collector = CommentCollector::new(&fetcher, &links, "Melden", 1);

    let comments = collector
        .collect("/Patchday-Adobe/comment/", "Patchday Adobe")
        .await;

    assert_eq!(comments, vec!["Passt".to_string()]);
}

#[tokio::test]
async fn test_unreachable_thread_yields_no_comments() {
    let mock_server = MockServer::start().await;

    let config = create_test_config(&mock_server.uri());
    let links = SiteLinks::new(&config.site, &config.vuln_db);
    let fetcher = HttpFetcher::from_config(&config.user_agent, 5).expect("Failed to build client");
    let collector = CommentCollector::new(&fetcher, &links, "Melden", 1);

    let comments = collector.collect("/Nichts/comment/", "Nichts").await;
    assert!(comments.is_empty());
}
