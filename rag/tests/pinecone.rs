use mockito::{Matcher, Server};
use rag::{
    connect_index, ensure_index, match_texts, retrieve_top, upsert_chunks, BatchReport, Chunk,
    Config, IndexHandle, RagError,
};
use serde_json::json;

fn config(pairs: Vec<(&'static str, String)>) -> Config {
    Config::from_lookup(move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    })
}

fn control_config(server: &Server) -> Config {
    config(vec![
        ("PINECONE_API_KEY", "pc-key".to_string()),
        ("PINECONE_API_URL", server.url()),
        ("INDEX_READY_POLL_SECS", "0".to_string()),
    ])
}

fn chunk(text: &str, page: u32) -> Chunk {
    Chunk {
        text: text.to_string(),
        source: "data/Medical_book.pdf".to_string(),
        page,
    }
}

#[test]
fn creates_missing_index_and_waits_until_ready() {
    let mut server = Server::new();
    let list = server
        .mock("GET", "/indexes")
        .match_header("api-key", "pc-key")
        .match_header("x-pinecone-api-version", Matcher::Any)
        .with_status(200)
        .with_body(json!({"indexes": [{"name": "other", "host": "other-1.svc.pinecone.io"}]}).to_string())
        .create();
    let create = server
        .mock("POST", "/indexes")
        .match_body(Matcher::Json(json!({
            "name": "medicalbot",
            "dimension": 384,
            "metric": "cosine",
            "spec": {"serverless": {"cloud": "aws", "region": "us-east-1"}}
        })))
        .with_status(201)
        .with_body(json!({"name": "medicalbot"}).to_string())
        .expect(1)
        .create();
    let describe = server
        .mock("GET", "/indexes/medicalbot")
        .with_status(200)
        .with_body(
            json!({
                "name": "medicalbot",
                "host": "medicalbot-1.svc.pinecone.io",
                "status": {"ready": true, "state": "Ready"}
            })
            .to_string(),
        )
        .create();

    assert!(ensure_index(&control_config(&server)).unwrap());
    list.assert();
    create.assert();
    describe.assert();
}

#[test]
fn existing_index_is_not_recreated() {
    let mut server = Server::new();
    let _list = server
        .mock("GET", "/indexes")
        .with_status(200)
        .with_body(json!({"indexes": [{"name": "medicalbot", "host": "medicalbot-1.svc.pinecone.io"}]}).to_string())
        .create();
    let create = server.mock("POST", "/indexes").expect(0).create();

    assert!(!ensure_index(&control_config(&server)).unwrap());
    create.assert();
}

#[test]
fn index_that_never_becomes_ready_times_out() {
    let mut server = Server::new();
    let _list = server
        .mock("GET", "/indexes")
        .with_status(200)
        .with_body(json!({"indexes": []}).to_string())
        .create();
    let _create = server.mock("POST", "/indexes").with_status(201).with_body("{}").create();
    let _describe = server
        .mock("GET", "/indexes/medicalbot")
        .with_status(200)
        .with_body(json!({"name": "medicalbot", "status": {"ready": false, "state": "Initializing"}}).to_string())
        .create();

    let cfg = config(vec![
        ("PINECONE_API_KEY", "pc-key".to_string()),
        ("PINECONE_API_URL", server.url()),
        ("INDEX_READY_POLL_SECS", "0".to_string()),
        ("INDEX_READY_TIMEOUT_SECS", "0".to_string()),
    ]);

    assert!(matches!(ensure_index(&cfg), Err(RagError::IndexNotReady { .. })));
}

#[test]
fn connect_resolves_host_from_describe_or_override() {
    let mut server = Server::new();
    let _describe = server
        .mock("GET", "/indexes/medicalbot")
        .with_status(200)
        .with_body(
            json!({"name": "medicalbot", "host": "medicalbot-1.svc.pinecone.io", "status": {"ready": true}})
                .to_string(),
        )
        .create();

    let index = connect_index(&control_config(&server)).unwrap();
    assert_eq!(index.host, "https://medicalbot-1.svc.pinecone.io");
    assert_eq!(index.name, "medicalbot");

    let cfg = config(vec![
        ("PINECONE_API_KEY", "pc-key".to_string()),
        ("PINECONE_INDEX_HOST", "http://localhost:5081/".to_string()),
    ]);
    assert_eq!(connect_index(&cfg).unwrap().host, "http://localhost:5081");
}

#[test]
fn missing_api_key_fails_before_any_request() {
    let mut server = Server::new();
    let any = server.mock("GET", Matcher::Any).expect(0).create();
    let cfg = config(vec![("PINECONE_API_URL", server.url())]);

    assert!(matches!(
        ensure_index(&cfg),
        Err(RagError::MissingKey("PINECONE_API_KEY"))
    ));
    any.assert();
}

#[test]
fn upserts_in_batches_with_sequential_ids() {
    let mut ollama = Server::new();
    let mut pinecone = Server::new();
    let _first_embed = ollama
        .mock("POST", "/api/embed")
        .match_body(Matcher::Json(json!({"model": "all-minilm", "input": ["c0", "c1"]})))
        .with_status(200)
        .with_body(json!({"embeddings": [[1.0, 0.0], [0.0, 1.0]]}).to_string())
        .create();
    let _second_embed = ollama
        .mock("POST", "/api/embed")
        .match_body(Matcher::Json(json!({"model": "all-minilm", "input": ["c2"]})))
        .with_status(200)
        .with_body(json!({"embeddings": [[0.5, 0.5]]}).to_string())
        .create();
    let first_upsert = pinecone
        .mock("POST", "/vectors/upsert")
        .match_header("api-key", "pc-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""id":"chunk-0""#.to_string()),
            Matcher::Regex(r#""id":"chunk-1""#.to_string()),
            Matcher::Regex(r#""source":"data/Medical_book.pdf""#.to_string()),
        ]))
        .with_status(200)
        .with_body(json!({"upsertedCount": 2}).to_string())
        .expect(1)
        .create();
    let second_upsert = pinecone
        .mock("POST", "/vectors/upsert")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""id":"chunk-2""#.to_string()),
            Matcher::Regex(r#""page":7"#.to_string()),
            Matcher::Regex(r#""text":"c2""#.to_string()),
        ]))
        .with_status(200)
        .with_body(json!({"upsertedCount": 1}).to_string())
        .expect(1)
        .create();

    let cfg = config(vec![
        ("PINECONE_API_KEY", "pc-key".to_string()),
        ("OLLAMA_URL", ollama.url()),
        ("RAG_BATCH_SIZE", "2".to_string()),
    ]);
    let index = IndexHandle {
        name: "medicalbot".to_string(),
        host: pinecone.url(),
    };
    let chunks = vec![chunk("c0", 0), chunk("c1", 0), chunk("c2", 7)];

    let mut reports = Vec::new();
    let total = upsert_chunks(&cfg, &index, &chunks, |r| reports.push(r)).unwrap();

    assert_eq!(total, 3);
    assert_eq!(
        reports,
        vec![
            BatchReport { start: 0, end: 2, upserted: 2 },
            BatchReport { start: 2, end: 3, upserted: 1 },
        ]
    );
    first_upsert.assert();
    second_upsert.assert();
}

#[test]
fn failed_upsert_stops_the_run() {
    let mut ollama = Server::new();
    let mut pinecone = Server::new();
    let _embed = ollama
        .mock("POST", "/api/embed")
        .with_status(200)
        .with_body(json!({"embeddings": [[1.0, 0.0]]}).to_string())
        .create();
    let upsert = pinecone
        .mock("POST", "/vectors/upsert")
        .with_status(400)
        .with_body("Vector dimension 2 does not match the dimension of the index 384")
        .expect(1)
        .create();

    let cfg = config(vec![
        ("PINECONE_API_KEY", "pc-key".to_string()),
        ("OLLAMA_URL", ollama.url()),
        ("RAG_BATCH_SIZE", "1".to_string()),
    ]);
    let index = IndexHandle {
        name: "medicalbot".to_string(),
        host: pinecone.url(),
    };
    let chunks = vec![chunk("c0", 0), chunk("c1", 0)];

    let mut reports = Vec::new();
    let err = upsert_chunks(&cfg, &index, &chunks, |r| reports.push(r)).unwrap_err();

    assert!(err.to_string().contains("does not match the dimension"));
    assert!(reports.is_empty());
    upsert.assert();
}

#[test]
fn query_returns_texts_of_matches_with_metadata() {
    let mut pinecone = Server::new();
    let query = pinecone
        .mock("POST", "/query")
        .match_header("api-key", "pc-key")
        .match_body(Matcher::PartialJson(json!({"topK": 3, "includeMetadata": true})))
        .with_status(200)
        .with_body(
            json!({"matches": [
                {"id": "chunk-4", "score": 0.91, "metadata": {"text": "Fever is a rise in body temperature.", "page": 3}},
                {"id": "chunk-9", "score": 0.80},
                {"id": "chunk-2", "score": 0.75, "metadata": {"source": "data/Medical_book.pdf"}},
                {"id": "chunk-5", "score": 0.70, "metadata": {"text": 42}},
                {"id": "chunk-1", "score": 0.60, "metadata": {"text": "Treat with rest and fluids."}}
            ]})
            .to_string(),
        )
        .create();

    let cfg = config(vec![("PINECONE_API_KEY", "pc-key".to_string())]);
    let index = IndexHandle {
        name: "medicalbot".to_string(),
        host: pinecone.url(),
    };

    let matches = retrieve_top(&cfg, &index, &[0.1, 0.2]).unwrap();
    assert_eq!(matches.len(), 5);
    assert_eq!(matches[0].id, "chunk-4");
    assert_eq!(
        match_texts(&matches),
        vec![
            "Fever is a rise in body temperature.".to_string(),
            "Treat with rest and fluids.".to_string(),
        ]
    );
    query.assert();
}
