//! Per-user session: credentials, the last generated outline, and the
//! generation handler that ties the two pipeline steps together.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use blogoutline_shared::{
    BlogOutlineError, Credentials, OutlineDocument, PreferencesBlock, Result, SessionId,
};

use crate::pipeline::{OutlineStep, ProgressReporter, ResearchStep};

/// MIME type of the outline download.
pub const DOWNLOAD_MIME: &str = "text/plain";

/// Where the session stands in its (tiny) lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No outline has been produced yet.
    Empty,
    /// An outline is stored and may be regenerated.
    Generated,
}

/// Session-scoped state owned by the UI and passed to the generation handler.
#[derive(Debug, Default)]
pub struct Session {
    pub id: SessionId,
    pub credentials: Credentials,
    outline: Option<OutlineDocument>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with credentials already known (e.g. from the environment).
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        if self.outline.is_some() {
            SessionState::Generated
        } else {
            SessionState::Empty
        }
    }

    pub fn outline(&self) -> Option<&OutlineDocument> {
        self.outline.as_ref()
    }

    /// Run research then outline and store the result, replacing any earlier
    /// outline.
    ///
    /// Missing credentials abort before either step is called. Step failures
    /// propagate unchanged and leave the previous outline in place.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn generate(
        &mut self,
        preferences: &PreferencesBlock,
        research: &dyn ResearchStep,
        outline: &dyn OutlineStep,
        progress: &dyn ProgressReporter,
    ) -> Result<&OutlineDocument> {
        let keys = match self.credentials.require() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(missing = ?self.credentials.missing(), "generation blocked");
                return Err(e);
            }
        };

        progress.phase("Researching reference articles");
        let research_result = research.submit(&keys, preferences).await?;

        progress.phase("Drafting a structured outline for your blog");
        let document = outline.submit(&keys, preferences, &research_result).await?;

        info!(chars = document.content.len(), "outline stored");
        progress.done(&document);
        Ok(&*self.outline.insert(document))
    }

    /// The stored outline as text for on-screen Markdown rendering.
    pub fn rendered_outline(&self) -> Option<&str> {
        self.outline.as_ref().map(|o| o.content.as_str())
    }

    /// The stored outline packaged as a plain-text download.
    pub fn download(&self, file_name: &str) -> Option<Download> {
        self.outline.as_ref().map(|o| Download {
            file_name: file_name.to_string(),
            mime: DOWNLOAD_MIME,
            content: o.content.clone(),
        })
    }
}

/// A file offered to the user, content verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub content: String,
}

impl Download {
    /// Write the file into `dir` and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.content).map_err(|e| BlogOutlineError::io(&path, e))?;
        info!(?path, bytes = self.content.len(), "outline saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentProgress;
    use async_trait::async_trait;
    use blogoutline_shared::{ApiKeys, Credential, ResearchResult};
    use std::sync::Mutex;

    /// Shared call log so ordering across both fakes can be asserted.
    #[derive(Default)]
    struct CallLog(Mutex<Vec<String>>);

    impl CallLog {
        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
        fn push(&self, s: String) {
            self.0.lock().unwrap().push(s);
        }
    }

    struct FakeResearch<'a> {
        log: &'a CallLog,
        answer: String,
    }

    #[async_trait]
    impl ResearchStep for FakeResearch<'_> {
        async fn submit(
            &self,
            keys: &ApiKeys,
            preferences: &PreferencesBlock,
        ) -> Result<ResearchResult> {
            self.log.push(format!("research:{}:{}", keys.serpapi, preferences.as_str()));
            Ok(ResearchResult(self.answer.clone()))
        }
    }

    struct FakeOutline<'a> {
        log: &'a CallLog,
        answer: String,
    }

    #[async_trait]
    impl OutlineStep for FakeOutline<'_> {
        async fn submit(
            &self,
            _keys: &ApiKeys,
            _preferences: &PreferencesBlock,
            research: &ResearchResult,
        ) -> Result<OutlineDocument> {
            self.log.push(format!("outline:{}", research.as_str()));
            Ok(OutlineDocument::new(self.answer.clone()))
        }
    }

    struct FailingResearch;

    #[async_trait]
    impl ResearchStep for FailingResearch {
        async fn submit(&self, _: &ApiKeys, _: &PreferencesBlock) -> Result<ResearchResult> {
            Err(BlogOutlineError::Network("connection refused".into()))
        }
    }

    fn ready_session() -> Session {
        let mut session = Session::new();
        session.credentials.set_openai_key("sk-test");
        session.credentials.set_serp_key("serp-test");
        session
    }

    fn prefs() -> PreferencesBlock {
        PreferencesBlock("\n- Blog Topic: Habits\n".into())
    }

    #[tokio::test]
    async fn missing_credentials_block_all_calls() {
        let cases = [
            (None, None, vec![Credential::OpenAi, Credential::SerpApi]),
            (None, Some("serp"), vec![Credential::OpenAi]),
            (Some("sk"), None, vec![Credential::SerpApi]),
        ];

        for (openai, serp, expected) in cases {
            let log = CallLog::default();
            let mut session = Session::new();
            if let Some(k) = openai {
                session.credentials.set_openai_key(k);
            }
            if let Some(k) = serp {
                session.credentials.set_serp_key(k);
            }

            let research = FakeResearch { log: &log, answer: "r".into() };
            let outline = FakeOutline { log: &log, answer: "o".into() };
            let err = session
                .generate(&prefs(), &research, &outline, &SilentProgress)
                .await
                .unwrap_err();

            match &err {
                BlogOutlineError::MissingCredentials(missing) => assert_eq!(missing, &expected),
                other => panic!("expected MissingCredentials, got {other:?}"),
            }
            let expected_lines: Vec<String> =
                expected.iter().map(|c| c.missing_message().to_string()).collect();
            assert_eq!(err.user_messages(), expected_lines);
            assert!(log.entries().is_empty());
            assert_eq!(session.state(), SessionState::Empty);
        }
    }

    #[tokio::test]
    async fn research_then_outline_exactly_once() {
        let log = CallLog::default();
        let mut session = ready_session();
        let research_text = "1. https://example.com/a\n2. https://example.com/b";
        let research = FakeResearch { log: &log, answer: research_text.into() };
        let outline = FakeOutline { log: &log, answer: "## 📝 Blog Outline".into() };

        let doc = session
            .generate(&prefs(), &research, &outline, &SilentProgress)
            .await
            .unwrap();
        assert_eq!(doc.content, "## 📝 Blog Outline");

        assert_eq!(
            log.entries(),
            vec![
                "research:serp-test:\n- Blog Topic: Habits\n".to_string(),
                format!("outline:{research_text}"),
            ]
        );
        assert_eq!(session.state(), SessionState::Generated);
    }

    #[tokio::test]
    async fn regeneration_overwrites() {
        let log = CallLog::default();
        let mut session = ready_session();

        let research = FakeResearch { log: &log, answer: "r".into() };
        let first = FakeOutline { log: &log, answer: "first outline".into() };
        session
            .generate(&prefs(), &research, &first, &SilentProgress)
            .await
            .unwrap();

        let second = FakeOutline { log: &log, answer: "second outline".into() };
        session
            .generate(&prefs(), &research, &second, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(session.rendered_outline(), Some("second outline"));
    }

    #[tokio::test]
    async fn failure_keeps_previous_outline() {
        let log = CallLog::default();
        let mut session = ready_session();
        let research = FakeResearch { log: &log, answer: "r".into() };
        let outline = FakeOutline { log: &log, answer: "kept".into() };
        session
            .generate(&prefs(), &research, &outline, &SilentProgress)
            .await
            .unwrap();

        let err = session
            .generate(&prefs(), &FailingResearch, &outline, &SilentProgress)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(session.rendered_outline(), Some("kept"));
    }

    #[tokio::test]
    async fn download_matches_rendered_outline() {
        let log = CallLog::default();
        let mut session = ready_session();
        assert!(session.download("blog_outline.txt").is_none());

        let body = "## 📝 Blog Outline\n\n### Why habits matter\n- point\n";
        let research = FakeResearch { log: &log, answer: "r".into() };
        let outline = FakeOutline { log: &log, answer: body.into() };
        session
            .generate(&prefs(), &research, &outline, &SilentProgress)
            .await
            .unwrap();

        let download = session.download("blog_outline.txt").unwrap();
        assert_eq!(download.file_name, "blog_outline.txt");
        assert_eq!(download.mime, "text/plain");
        assert_eq!(Some(download.content.as_str()), session.rendered_outline());
        assert_eq!(download.content, body);
    }

    #[test]
    fn download_writes_verbatim_file() {
        let dir = std::env::temp_dir().join(format!("blogoutline-test-{}", SessionId::new()));
        std::fs::create_dir_all(&dir).unwrap();

        let download = Download {
            file_name: "blog_outline.txt".into(),
            mime: DOWNLOAD_MIME,
            content: "## 📝 Blog Outline\n".into(),
        };
        let path = download.write_to(&dir).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "## 📝 Blog Outline\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
