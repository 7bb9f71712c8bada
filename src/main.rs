use cooktube::{ExtractionPipeline, Locale};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(error) = run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (url, locale) = parse_args(&args)
        .map_err(|message| format!("{message}\nUsage: cooktube <youtube-url> [--locale en|ko]"))?;

    let pipeline = ExtractionPipeline::builder().build()?;
    let recipe = pipeline.run(&url, locale, None).await?;

    println!("{}", serde_json::to_string_pretty(&recipe)?);
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(String, Locale), String> {
    let mut url = None;
    let mut locale = Locale::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--locale" => {
                let value = iter.next().ok_or("--locale requires a value (en or ko)")?;
                locale = value.parse()?;
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unexpected flag '{flag}'"));
            }
            _ if url.is_none() => url = Some(arg.clone()),
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }

    let url = url.ok_or("Please provide a YouTube URL as an argument")?;
    Ok((url, locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_url_with_default_locale() {
        let (url, locale) = parse_args(&args(&["https://youtu.be/abc123"])).unwrap();
        assert_eq!(url, "https://youtu.be/abc123");
        assert_eq!(locale, Locale::En);
    }

    #[test]
    fn parses_locale_flag_in_any_position() {
        let (url, locale) =
            parse_args(&args(&["--locale", "ko", "https://youtu.be/abc123"])).unwrap();
        assert_eq!(url, "https://youtu.be/abc123");
        assert_eq!(locale, Locale::Ko);
    }

    #[test]
    fn rejects_missing_url_and_bad_flags() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--locale"])).is_err());
        assert!(parse_args(&args(&["--locale", "fr", "url"])).is_err());
        assert!(parse_args(&args(&["--verbose", "url"])).is_err());
    }
}
