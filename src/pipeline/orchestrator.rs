// file: src/pipeline/orchestrator.rs
// description: find-or-generate pipeline driving extraction, lookup, translation and speech
// reference: sequential orchestration over the service traits

use super::progress::{StepProgress, TOTAL_STEPS};
use crate::config::{Config, GeneratorConfig};
use crate::document::{PdfSource, TextExtractor};
use crate::models::{Action, Notice, Outcome, Poem, PoemOrigin, Session, Translation};
use crate::poem::PoemLocator;
use crate::services::{PoemGenerator, PoemTranslator, SpeechSynthesizer};
use crate::utils::{OperationTimer, Validator};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const EMPTY_TITLE_NOTICE: &str = "Please enter a poem title.";
pub const FOUND_NOTICE: &str = "Poem found in PDF!";
pub const GENERATING_NOTICE: &str = "Not found in PDFs, generating with AI…";
pub const NO_VOICE_NOTICE: &str = "Voice not available for this language.";

pub struct Orchestrator<G, T, S> {
    builtin_path: PathBuf,
    generator_config: GeneratorConfig,
    slow_call: Duration,
    show_progress: bool,
    extractor: TextExtractor,
    locator: PoemLocator,
    generator: G,
    translator: T,
    speech: S,
}

impl<G, T, S> Orchestrator<G, T, S>
where
    G: PoemGenerator,
    T: PoemTranslator,
    S: SpeechSynthesizer,
{
    pub fn new(config: &Config, generator: G, translator: T, speech: S) -> Self {
        Self {
            builtin_path: config.documents.builtin_path.clone(),
            generator_config: config.generator.clone(),
            slow_call: config.http.slow_call(),
            show_progress: false,
            extractor: TextExtractor::new(),
            locator: PoemLocator::new(),
            generator,
            translator,
            speech,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Problems worth reporting before the first interaction.
    pub fn startup_notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();

        if !self.builtin_path.exists() {
            warn!("Built-in document missing: {}", self.builtin_path.display());
            notices.push(Notice::error(format!(
                "Missing built-in file: {}",
                self.builtin_path.display()
            )));
        }

        if self.generator_config.api_key.is_none() {
            warn!("No generator API key configured");
            notices.push(Notice::warning(format!(
                "{} is not set; poems missing from the PDFs cannot be generated.",
                crate::config::API_KEY_ENV
            )));
        }

        notices
    }

    pub async fn handle(&self, session: Session, action: Action) -> Session {
        match action {
            Action::ClearAll => {
                info!("Clearing session state");
                Session::new()
            }
            Action::FindOrGenerate => {
                let outcome = self.find_or_generate(&session).await;
                Session {
                    last_outcome: Some(outcome),
                    ..session
                }
            }
        }
    }

    pub async fn find_or_generate(&self, session: &Session) -> Outcome {
        let mut outcome = Outcome::new();

        let title = match Validator::validate_title(&session.title) {
            Ok(title) => title,
            Err(_) => {
                outcome.notify(Notice::warning(EMPTY_TITLE_NOTICE));
                return outcome;
            }
        };

        info!("Searching for '{}' ({})", title, session.language);
        let mut progress = StepProgress::new(TOTAL_STEPS, self.show_progress);

        progress.advance("Reading documents");
        let combined = self.combined_text(session, &mut outcome);

        progress.advance(&format!("Looking up '{}'", title));
        let poem = self.find_poem(&combined, title, &mut outcome).await;

        let Some(poem) = poem else {
            progress.finish();
            return outcome;
        };

        progress.advance(&format!("Translating to {}", session.language));
        let translation = self.translate(&poem.text, session, &mut outcome).await;

        progress.advance("Synthesizing speech");
        outcome.audio = self.synthesize(&translation.text, session, &mut outcome).await;

        outcome.poem = Some(poem);
        outcome.translation = Some(translation);
        progress.finish();
        outcome
    }

    fn sources(&self, session: &Session) -> Vec<PdfSource> {
        let mut sources = Vec::new();

        if self.builtin_path.exists() {
            sources.push(PdfSource::from_path(&self.builtin_path));
        } else {
            debug!("Skipping missing built-in document {}", self.builtin_path.display());
        }

        if let Some(upload) = &session.upload {
            sources.push(upload.clone());
        }

        sources
    }

    /// A source that cannot be parsed contributes no text.
    fn combined_text(&self, session: &Session, outcome: &mut Outcome) -> String {
        let mut texts = Vec::new();

        for source in self.sources(session) {
            match self.extractor.extract(&source) {
                Ok(text) => texts.push(text),
                Err(e) => {
                    warn!("Failed to extract text from {}: {}", source.name(), e);
                    outcome.notify(Notice::warning(format!(
                        "Could not read {}: {}",
                        source.name(),
                        e
                    )));
                }
            }
        }

        texts.join("\n")
    }

    async fn find_poem(&self, combined: &str, title: &str, outcome: &mut Outcome) -> Option<Poem> {
        let located = self.locator.locate(combined, title).unwrap_or_else(|e| {
            warn!("Locator rejected title '{}': {}", title, e);
            None
        });

        if let Some(text) = located {
            info!("Found '{}' in documents", title);
            outcome.notify(Notice::success(FOUND_NOTICE));
            return Some(Poem {
                text,
                origin: PoemOrigin::Found,
            });
        }

        outcome.notify(Notice::info(GENERATING_NOTICE));
        let prompt = self.generator_config.prompt_for(title);

        let timer = OperationTimer::new("generate poem");
        let generated = self.generator.generate(&prompt).await;
        timer.warn_if_slow(self.slow_call);
        timer.finish();

        match generated {
            Ok(text) => {
                debug!("Generated poem: {}", Validator::truncate_text(&text, 60));
                Some(Poem {
                    text,
                    origin: PoemOrigin::Generated,
                })
            }
            Err(e) => {
                warn!("Generation failed for '{}': {}", title, e);
                outcome.notify(Notice::error(format!("AI error: {}", e)));
                None
            }
        }
    }

    /// Falls back to the untranslated poem on failure.
    async fn translate(&self, text: &str, session: &Session, outcome: &mut Outcome) -> Translation {
        let timer = OperationTimer::new("translate poem");
        let translated = self.translator.translate(text, session.language).await;
        timer.warn_if_slow(self.slow_call);
        timer.finish();

        match translated {
            Ok(translated) => Translation {
                language: session.language,
                text: translated,
                translated: true,
            },
            Err(e) => {
                warn!("Translation to {} failed: {}", session.language, e);
                outcome.notify(Notice::warning(format!("Translation failed: {}", e)));
                Translation {
                    language: session.language,
                    text: text.to_string(),
                    translated: false,
                }
            }
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        session: &Session,
        outcome: &mut Outcome,
    ) -> Option<PathBuf> {
        let timer = OperationTimer::new("synthesize speech");
        let audio = self.speech.synthesize(text, session.language).await;
        timer.warn_if_slow(self.slow_call);
        timer.finish();

        match audio {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Speech synthesis in {} failed: {}", session.language, e);
                outcome.notify(Notice::warning(NO_VOICE_NOTICE));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::build_pdf;
    use crate::error::{Result, RhymeError};
    use crate::models::{Language, NoticeLevel};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    type Calls = Arc<Mutex<Vec<String>>>;

    struct FakeGenerator {
        reply: std::result::Result<String, String>,
        prompts: Calls,
    }

    impl PoemGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(RhymeError::Generation)
        }
    }

    struct FakeTranslator {
        fail: bool,
        calls: Calls,
    }

    impl PoemTranslator for FakeTranslator {
        async fn translate(&self, text: &str, target: Language) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}", target.code(), text));
            if self.fail {
                return Err(RhymeError::Translation("service unavailable".to_string()));
            }
            Ok(format!("[{}] {}", target.code(), text))
        }
    }

    struct FakeSpeech {
        fail: bool,
        calls: Calls,
    }

    impl SpeechSynthesizer for FakeSpeech {
        async fn synthesize(&self, text: &str, language: Language) -> Result<PathBuf> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}", language.code(), text));
            if self.fail {
                return Err(RhymeError::Speech("unsupported".to_string()));
            }
            Ok(PathBuf::from("/tmp/poem-test.mp3"))
        }
    }

    struct Harness {
        orchestrator: Orchestrator<FakeGenerator, FakeTranslator, FakeSpeech>,
        prompts: Calls,
        translations: Calls,
        speech: Calls,
    }

    struct Options {
        builtin: PathBuf,
        generator_reply: std::result::Result<String, String>,
        translator_fails: bool,
        speech_fails: bool,
    }

    impl Options {
        fn new(builtin: &Path) -> Self {
            Self {
                builtin: builtin.to_path_buf(),
                generator_reply: Ok("A generated rhyme".to_string()),
                translator_fails: false,
                speech_fails: false,
            }
        }
    }

    fn harness(options: Options) -> Harness {
        let mut config = Config::default_config();
        config.documents.builtin_path = options.builtin;
        config.generator.api_key = Some("test-key".to_string());

        let prompts = Calls::default();
        let translations = Calls::default();
        let speech = Calls::default();

        let orchestrator = Orchestrator::new(
            &config,
            FakeGenerator {
                reply: options.generator_reply,
                prompts: Arc::clone(&prompts),
            },
            FakeTranslator {
                fail: options.translator_fails,
                calls: Arc::clone(&translations),
            },
            FakeSpeech {
                fail: options.speech_fails,
                calls: Arc::clone(&speech),
            },
        );

        Harness {
            orchestrator,
            prompts,
            translations,
            speech,
        }
    }

    fn write_pdf(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, build_pdf(&[lines])).unwrap();
        path
    }

    fn levels(outcome: &Outcome) -> Vec<NoticeLevel> {
        outcome.notices.iter().map(|n| n.level).collect()
    }

    #[test]
    fn test_empty_title_only_warns() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.pdf");
        fs::write(&broken, b"not a pdf").unwrap();
        let h = harness(Options::new(&broken));

        let session = Session::new().with_title("   ");
        let outcome = tokio_test::block_on(h.orchestrator.find_or_generate(&session));

        assert_eq!(outcome.notices, vec![Notice::warning(EMPTY_TITLE_NOTICE)]);
        assert!(outcome.poem.is_none());
        assert!(outcome.translation.is_none());
        assert!(outcome.audio.is_none());
        assert!(h.prompts.lock().unwrap().is_empty());
        assert!(h.translations.lock().unwrap().is_empty());
        assert!(h.speech.lock().unwrap().is_empty());
    }

    #[test]
    fn test_found_in_builtin_document() {
        let temp = TempDir::new().unwrap();
        let builtin = write_pdf(
            &temp,
            "builtin.pdf",
            &["Jack and Jill", "Went up the hill", "To fetch a pail of water"],
        );
        let h = harness(Options::new(&builtin));

        let session = Session::new()
            .with_title("jack and jill")
            .with_language(Language::French);
        let outcome = tokio_test::block_on(h.orchestrator.find_or_generate(&session));

        let poem = outcome.poem.clone().unwrap();
        assert_eq!(poem.origin, PoemOrigin::Found);
        assert_eq!(poem.text, "Went up the hill\nTo fetch a pail of water");
        assert_eq!(levels(&outcome), vec![NoticeLevel::Success]);
        assert!(h.prompts.lock().unwrap().is_empty());

        let translation = outcome.translation.unwrap();
        assert!(translation.translated);
        assert_eq!(translation.text, "[fr] Went up the hill\nTo fetch a pail of water");
        assert_eq!(outcome.audio, Some(PathBuf::from("/tmp/poem-test.mp3")));
        assert_eq!(
            h.speech.lock().unwrap().clone(),
            vec!["fr:[fr] Went up the hill\nTo fetch a pail of water".to_string()]
        );
    }

    #[test]
    fn test_stanza_ends_at_blank_line_between_documents() {
        let temp = TempDir::new().unwrap();
        let builtin = write_pdf(
            &temp,
            "builtin.pdf",
            &[
                "Twinkle Twinkle",
                "Twinkle twinkle little star",
                "How I wonder what you are",
            ],
        );
        let upload = write_pdf(&temp, "upload.pdf", &["Other content"]);
        let h = harness(Options::new(&builtin));

        let session = Session::new()
            .with_title("twinkle twinkle")
            .with_upload(PdfSource::load(&upload).unwrap());
        let outcome = tokio_test::block_on(h.orchestrator.find_or_generate(&session));

        assert_eq!(
            outcome.poem.unwrap().text,
            "Twinkle twinkle little star\nHow I wonder what you are"
        );
    }

    #[test]
    fn test_found_in_upload_when_builtin_missing() {
        let temp = TempDir::new().unwrap();
        let upload = write_pdf(&temp, "upload.pdf", &["Humpty Dumpty", "Sat on a wall"]);
        let h = harness(Options::new(&temp.path().join("missing.pdf")));

        let session = Session::new()
            .with_title("Humpty Dumpty")
            .with_upload(PdfSource::from_path(&upload));
        let outcome = tokio_test::block_on(h.orchestrator.find_or_generate(&session));

        assert_eq!(
            outcome.poem.as_ref().map(|poem| poem.text.as_str()),
            Some("Sat on a wall")
        );
        assert_eq!(levels(&outcome), vec![NoticeLevel::Success]);
    }

    #[test]
    fn test_missing_title_invokes_generator_with_title() {
        let temp = TempDir::new().unwrap();
        let builtin = write_pdf(&temp, "builtin.pdf", &["Jack and Jill", "Went up the hill"]);
        let h = harness(Options::new(&builtin));

        let session = Session::new().with_title("The Owl and the Pussycat");
        let outcome = tokio_test::block_on(h.orchestrator.find_or_generate(&session));

        let prompts = h.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("The Owl and the Pussycat"));

        let poem = outcome.poem.clone().unwrap();
        assert_eq!(poem.origin, PoemOrigin::Generated);
        assert_eq!(poem.text, "A generated rhyme");
        assert_eq!(outcome.notices, vec![Notice::info(GENERATING_NOTICE)]);
        assert!(outcome.audio.is_some());
    }

    #[test]
    fn test_generation_failure_skips_downstream_steps() {
        let temp = TempDir::new().unwrap();
        let mut options = Options::new(&temp.path().join("missing.pdf"));
        options.generator_reply = Err("quota exceeded".to_string());
        let h = harness(options);

        let session = Session::new().with_title("Unknown Rhyme");
        let outcome = tokio_test::block_on(h.orchestrator.find_or_generate(&session));

        assert!(outcome.poem.is_none());
        assert!(outcome.translation.is_none());
        assert!(outcome.audio.is_none());
        assert_eq!(levels(&outcome), vec![NoticeLevel::Info, NoticeLevel::Error]);
        assert!(outcome.notices[1].message.starts_with("AI error:"));
        assert!(outcome.notices[1].message.contains("quota exceeded"));
        assert!(h.translations.lock().unwrap().is_empty());
        assert!(h.speech.lock().unwrap().is_empty());
    }

    #[test]
    fn test_translation_failure_degrades_to_original() {
        let temp = TempDir::new().unwrap();
        let builtin = write_pdf(&temp, "builtin.pdf", &["Rain Rain", "Go away"]);
        let mut options = Options::new(&builtin);
        options.translator_fails = true;
        let h = harness(options);

        let session = Session::new()
            .with_title("rain rain")
            .with_language(Language::Urdu);
        let outcome = tokio_test::block_on(h.orchestrator.find_or_generate(&session));

        let translation = outcome.translation.clone().unwrap();
        assert!(!translation.translated);
        assert_eq!(translation.text, "Go away");
        assert_eq!(translation.text, outcome.poem.clone().unwrap().text);
        assert_eq!(
            levels(&outcome),
            vec![NoticeLevel::Success, NoticeLevel::Warning]
        );
        assert!(outcome.notices[1].message.starts_with("Translation failed:"));
        assert_eq!(h.speech.lock().unwrap().clone(), vec!["ur:Go away".to_string()]);
        assert!(outcome.audio.is_some());
    }

    #[test]
    fn test_speech_failure_omits_audio() {
        let temp = TempDir::new().unwrap();
        let builtin = write_pdf(&temp, "builtin.pdf", &["Rain Rain", "Go away"]);
        let mut options = Options::new(&builtin);
        options.speech_fails = true;
        let h = harness(options);

        let session = Session::new().with_title("rain rain");
        let outcome = tokio_test::block_on(h.orchestrator.find_or_generate(&session));

        assert!(outcome.poem.is_some());
        assert!(outcome.translation.is_some());
        assert!(outcome.audio.is_none());
        assert_eq!(outcome.notices.last(), Some(&Notice::warning(NO_VOICE_NOTICE)));
    }

    #[test]
    fn test_unreadable_builtin_falls_back_to_generation() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.pdf");
        fs::write(&broken, b"not a pdf").unwrap();
        let h = harness(Options::new(&broken));

        let session = Session::new().with_title("Jack and Jill");
        let outcome = tokio_test::block_on(h.orchestrator.find_or_generate(&session));

        assert_eq!(
            levels(&outcome),
            vec![NoticeLevel::Warning, NoticeLevel::Info]
        );
        assert!(outcome.notices[0].message.starts_with("Could not read"));
        assert_eq!(outcome.poem.unwrap().origin, PoemOrigin::Generated);
    }

    #[test]
    fn test_handle_stores_outcome_and_clear_resets() {
        let temp = TempDir::new().unwrap();
        let h = harness(Options::new(&temp.path().join("missing.pdf")));

        let session = Session::new()
            .with_title("Little Boy Blue")
            .with_language(Language::German);
        let session = tokio_test::block_on(h.orchestrator.handle(session, Action::FindOrGenerate));

        assert_eq!(session.title, "Little Boy Blue");
        assert_eq!(session.language, Language::German);
        assert!(session.last_outcome.as_ref().is_some_and(Outcome::has_poem));

        let session = tokio_test::block_on(h.orchestrator.handle(session, Action::ClearAll));
        assert!(session.title.is_empty());
        assert_eq!(session.language, Language::English);
        assert!(session.upload.is_none());
        assert!(session.last_outcome.is_none());
    }

    #[test]
    fn test_startup_notices_report_missing_builtin() {
        let temp = TempDir::new().unwrap();
        let h = harness(Options::new(&temp.path().join("missing.pdf")));

        let notices = h.orchestrator.startup_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.contains("missing.pdf"));
    }
}
