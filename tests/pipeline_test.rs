//! End-to-end pipeline test: a generated PDF goes through text extraction,
//! splitting, embedding and the retrieval chain against a mocked Ollama.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use doc_sentry::config::Config;
use doc_sentry::detect::{detect_pattern_based, format_answer, hybrid_analysis};
use doc_sentry::rag::{DocumentPipeline, RagPipeline};

/// Build a PDF with one page per entry; `None` is a page with no text.
fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn config_for(base_url: &str) -> Config {
    let mut config = Config::default();
    config.llm.base_url = base_url.to_string();
    config
}

#[tokio::test]
async fn test_pdf_to_hybrid_answer() {
    let mut server = mockito::Server::new_async().await;
    // One chunk to index, then one query vector.
    let embed = server
        .mock("POST", "/api/embed")
        .with_status(200)
        .with_body(r#"{"embeddings": [[0.6, 0.8]]}"#)
        .expect(2)
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(
            r#"{"message": {"role": "assistant", "content": "The document lists a social security number."}}"#,
        )
        .create_async()
        .await;

    let pdf = build_pdf(&[Some("Employee SSN 123-45-6789 on file"), None]);
    let pipeline = RagPipeline::new(reqwest::Client::new(), &config_for(&server.url()));
    let document = pipeline.build("employee.pdf", pdf).await.unwrap();

    assert_eq!(document.filename, "employee.pdf");
    assert_eq!(document.page_count, 2);
    assert_eq!(document.chunk_count, 1);
    assert!(document.text.contains("123-45-6789"));

    let contextual = document.chain.query("Which SSNs appear?").await.unwrap();
    assert_eq!(contextual, "The document lists a social security number.");

    let answer = format_answer(&hybrid_analysis(&document.text, &contextual));
    assert!(answer.contains("- ssn: 123-45-6789"));
    assert!(answer.ends_with("The document lists a social security number."));

    embed.assert_async().await;
    chat.assert_async().await;
}

#[tokio::test]
async fn test_index_cap_limits_embedding_but_not_detection() {
    let mut server = mockito::Server::new_async().await;
    // A single vector back: any request carrying more than one input fails
    // the count check in the embedding client.
    let embed = server
        .mock("POST", "/api/embed")
        .with_status(200)
        .with_body(r#"{"embeddings": [[1.0, 0.0]]}"#)
        .expect(1)
        .create_async()
        .await;

    let mut config = config_for(&server.url());
    config.pipeline.max_index_chunks = 1;

    // Pages are split independently, so two text pages make two chunks.
    let pdf = build_pdf(&[
        Some("Quarterly audit record for the finance team"),
        Some("Escalations go to auditor@corp.com"),
    ]);
    let pipeline = RagPipeline::new(reqwest::Client::new(), &config);
    let document = pipeline.build("audit.pdf", pdf).await.unwrap();

    assert_eq!(document.page_count, 2);
    assert_eq!(document.chunk_count, 1);
    assert!(document.text.contains("auditor@corp.com"));

    let matches = detect_pattern_based(&document.text);
    assert!(matches.iter().any(|m| m.value == "auditor@corp.com"));

    embed.assert_async().await;
}

#[tokio::test]
async fn test_textless_pdf_is_rejected_before_embedding() {
    let mut server = mockito::Server::new_async().await;
    let embed = server
        .mock("POST", "/api/embed")
        .expect(0)
        .create_async()
        .await;

    let pdf = build_pdf(&[None, None]);
    let pipeline = RagPipeline::new(reqwest::Client::new(), &config_for(&server.url()));
    let err = pipeline.build("scan.pdf", pdf).await.unwrap_err();

    assert!(err.to_string().contains("no extractable text"));
    embed.assert_async().await;
}

#[tokio::test]
async fn test_corrupt_pdf_is_rejected() {
    let pipeline = RagPipeline::new(reqwest::Client::new(), &Config::default());
    let err = pipeline
        .build("broken.pdf", b"%PDF-1.4 not really".to_vec())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse PDF"));
}

#[tokio::test]
async fn test_embedding_failure_propagates() {
    let mut server = mockito::Server::new_async().await;
    let _embed = server
        .mock("POST", "/api/embed")
        .with_status(500)
        .with_body("model not loaded")
        .create_async()
        .await;

    let pdf = build_pdf(&[Some("contact a@b.com")]);
    let pipeline = RagPipeline::new(reqwest::Client::new(), &config_for(&server.url()));
    let err = pipeline.build("a.pdf", pdf).await.unwrap_err();
    assert!(format!("{err:#}").contains("Failed to embed document chunks"));
}

#[test]
fn test_detection_scans_generated_text() {
    let matches = detect_pattern_based("Employee SSN 123-45-6789 on file");
    assert!(matches.iter().any(|m| m.value == "123-45-6789"));
}
