use cooktube::{resolve_video_id, Locale, TimedTextFetcher, TranscriptFetcher};

#[tokio::test]
#[ignore] // This test requires network access
async fn fetch_real_transcript() {
    let _ = env_logger::try_init();

    let video_id = resolve_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .expect("Failed to resolve video id");
    let fetcher = TimedTextFetcher::new(None);

    match fetcher.fetch(&video_id).await {
        Ok(transcript) => {
            println!("Fetched {} characters of transcript", transcript.text.len());
            if let Some(title) = &transcript.title {
                println!("Video title: {title}");
            }
            assert!(!transcript.text.is_empty());
        }
        Err(e) => panic!("Failed to fetch transcript: {e}"),
    }
}

#[tokio::test]
#[ignore] // This test requires network access and a GEMINI_API_KEY
async fn extract_real_recipe() {
    let _ = env_logger::try_init();

    if std::env::var("GEMINI_API_KEY").is_err() {
        println!("GEMINI_API_KEY not set, skipping");
        return;
    }

    // Kenji's kitchen-tour omelette video keeps its captions on
    let url = "https://www.youtube.com/watch?v=kLO5mKdeEPA";
    match cooktube::extract_recipe(url, Locale::En).await {
        Ok(recipe) => {
            println!("{}", serde_json::to_string_pretty(&recipe).unwrap());
            assert!(!recipe.title.is_empty());
            assert!(!recipe.instructions.is_empty());
        }
        Err(e) => panic!("Failed to extract recipe: {e}"),
    }
}
