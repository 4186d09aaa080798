use std::path::Path;

use eframe::egui;

use crate::backend;
use crate::config::AppConfig;
use crate::data::error::ConvertError;
use crate::data::model::{ExportFormat, RawSource};
use crate::data::pipeline::{Conversion, convert};
use crate::data::source::{Auth, AuthKind, fetch};

// ---------------------------------------------------------------------------
// Queued actions
// ---------------------------------------------------------------------------

/// Work triggered by a click. Runs at the start of the next frame so the
/// spinner for it is already on screen.
#[derive(Debug, Clone)]
pub enum Action {
    Upload { name: String, bytes: Vec<u8> },
    Fetch { url: String, auth: Auth },
    InstallBackend,
}

impl Action {
    pub fn spinner_text(&self) -> &'static str {
        match self {
            Action::Upload { .. } => "Reading LAZ file…",
            Action::Fetch { .. } => "Downloading .laz from URL…",
            Action::InstallBackend => "Installing LAZ backend…",
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session counter
// ---------------------------------------------------------------------------

/// A `u64` kept under a fixed id in the egui context's session storage.
#[derive(Debug, Clone, Copy)]
pub struct SessionCounter {
    id: egui::Id,
}

impl Default for SessionCounter {
    fn default() -> Self {
        Self {
            id: egui::Id::new("session_counter"),
        }
    }
}

impl SessionCounter {
    pub fn value(&self, ctx: &egui::Context) -> u64 {
        ctx.data_mut(|d| *d.get_temp_mut_or_default::<u64>(self.id))
    }

    /// Add one and return the new value.
    pub fn increment(&self, ctx: &egui::Context) -> u64 {
        ctx.data_mut(|d| {
            let value = d.get_temp_mut_or_default::<u64>(self.id);
            *value += 1;
            *value
        })
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Selected output format.
    pub output_format: ExportFormat,

    /// URL form inputs.
    pub url_input: String,
    pub auth_kind: AuthKind,
    pub token_input: String,
    pub username_input: String,
    pub password_input: String,

    /// Last successful conversion (None until something loads).
    pub conversion: Option<Conversion>,

    /// Messages shown in the side panel, newest last.
    pub messages: Vec<Message>,

    /// Set when the last decode failed for lack of a LAZ backend.
    pub backend_missing: bool,

    /// Action waiting for the next frame.
    pub pending: Option<Action>,

    pub counter: SessionCounter,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            output_format: config.default_format,
            config,
            url_input: String::new(),
            auth_kind: AuthKind::None,
            token_input: String::new(),
            username_input: String::new(),
            password_input: String::new(),
            conversion: None,
            messages: Vec::new(),
            backend_missing: false,
            pending: None,
            counter: SessionCounter::default(),
        }
    }

    /// Credential built from the auth form fields.
    pub fn auth(&self) -> Auth {
        Auth::from_inputs(
            self.auth_kind,
            &self.token_input,
            &self.username_input,
            &self.password_input,
        )
    }

    pub fn queue(&mut self, action: Action) {
        self.pending = Some(action);
    }

    /// Queue a fetch of the URL field, if it holds anything.
    pub fn queue_fetch(&mut self) {
        let url = self.url_input.trim().to_string();
        if url.is_empty() {
            return;
        }
        let auth = self.auth();
        self.queue(Action::Fetch { url, auth });
    }

    /// Read a local file and queue it as an upload.
    pub fn queue_upload_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.laz".to_string());
        match std::fs::read(path) {
            Ok(bytes) => self.queue(Action::Upload { name, bytes }),
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                self.push(MessageKind::Error, format!("Error reading {name}: {e}"));
            }
        }
    }

    /// Execute the queued action, if any.
    pub fn run_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        self.messages.clear();
        match action {
            Action::Upload { name, bytes } => {
                let result = convert(RawSource::from_upload(name, bytes), self.output_format);
                self.finish_conversion(result, "Loaded");
            }
            Action::Fetch { url, auth } => {
                log::info!("Fetching {url}");
                let format = self.output_format;
                let result = fetch(&url, &auth, &self.config.fetch)
                    .and_then(|source| convert(source, format));
                self.finish_conversion(result, "Downloaded and loaded");
            }
            Action::InstallBackend => self.install_backend(),
        }
    }

    fn finish_conversion(&mut self, result: Result<Conversion, ConvertError>, verb: &str) {
        match result {
            Ok(conversion) => {
                let n = conversion.cloud.len();
                log::info!("{verb} {n} points from {}", conversion.origin);
                self.push(
                    MessageKind::Success,
                    format!("{verb} {} points successfully", group_thousands(n)),
                );
                self.conversion = Some(conversion);
                self.backend_missing = false;
            }
            Err(e) => {
                log::error!("Conversion failed: {e:#}");
                self.conversion = None;
                self.backend_missing = e.is_backend_unavailable();
                self.report(&e);
            }
        }
    }

    fn report(&mut self, e: &ConvertError) {
        let headline = match e {
            ConvertError::BackendUnavailable => {
                "LAZ backend not available: this build can't decompress .laz data.".to_string()
            }
            ConvertError::HttpStatus { status: 401, .. } => {
                "401 Unauthorized: the URL requires credentials or a presigned URL.".to_string()
            }
            _ => format!("Error converting file: {e}"),
        };
        self.push(MessageKind::Error, headline);

        match e {
            ConvertError::HttpStatus { body_preview, .. } if !body_preview.is_empty() => {
                self.push(MessageKind::Info, body_preview.clone());
            }
            ConvertError::UnexpectedContent { preview, .. } => {
                self.push(MessageKind::Info, preview.clone());
            }
            _ => {}
        }

        if let Some(hint) = e.remediation() {
            self.push(MessageKind::Info, hint);
        }
        if e.is_backend_unavailable() {
            self.push(
                MessageKind::Info,
                format!("Recommended command: {}", self.config.install.display()),
            );
        }
    }

    fn install_backend(&mut self) {
        match backend::install_backend(&self.config.install) {
            Ok(()) => {
                self.backend_missing = false;
                self.push(
                    MessageKind::Success,
                    "LAZ backend installed. Please restart the app.",
                );
            }
            Err(e) => {
                log::error!("Backend install failed: {e:#}");
                self.push(MessageKind::Error, format!("Installation failed: {e:#}"));
                self.push(
                    MessageKind::Info,
                    "Run the install command in your terminal if this fails.",
                );
            }
        }
    }

    /// Switch format, re-exporting the loaded cloud.
    pub fn set_output_format(&mut self, format: ExportFormat) {
        self.output_format = format;
        let Some(conversion) = &mut self.conversion else {
            return;
        };
        if let Err(e) = conversion.reexport(format) {
            log::error!("Re-export failed: {e:#}");
            self.push(MessageKind::Error, format!("Error converting file: {e}"));
        }
    }

    /// Write the current export to `path`.
    pub fn save_export(&mut self, path: &Path) {
        let Some(conversion) = &self.conversion else {
            return;
        };
        match std::fs::write(path, &conversion.table.bytes) {
            Ok(()) => {
                log::info!(
                    "Saved {} ({} bytes, {})",
                    path.display(),
                    conversion.table.bytes.len(),
                    conversion.table.mime()
                );
                self.push(MessageKind::Success, format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save {}: {e}", path.display());
                self.push(MessageKind::Error, format!("Error saving file: {e}"));
            }
        }
    }

    fn push(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.messages.push(Message::new(kind, text));
    }
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn counter_increments_by_one() {
        let ctx = egui::Context::default();
        let counter = SessionCounter::default();
        assert_eq!(counter.value(&ctx), 0);
        assert_eq!(counter.increment(&ctx), 1);
        assert_eq!(counter.increment(&ctx), 2);
        assert_eq!(counter.value(&ctx), 2);
    }

    #[test]
    fn empty_url_is_not_queued() {
        let mut state = AppState::default();
        state.url_input = "   ".into();
        state.queue_fetch();
        assert!(state.pending.is_none());
    }

    #[test]
    fn fetch_uses_selected_auth() {
        let mut state = AppState::default();
        state.url_input = " https://example.com/a.laz ".into();
        state.auth_kind = AuthKind::Bearer;
        state.token_input = "tok".into();
        state.queue_fetch();
        match state.pending {
            Some(Action::Fetch { url, auth }) => {
                assert_eq!(url, "https://example.com/a.laz");
                assert_eq!(auth, Auth::Bearer("tok".into()));
            }
            other => panic!("unexpected pending action: {other:?}"),
        }
    }

    #[test]
    fn bad_upload_reports_error_and_keeps_nothing() {
        let mut state = AppState::default();
        state.queue(Action::Upload {
            name: "bad.laz".into(),
            bytes: b"nope".to_vec(),
        });
        state.run_pending();

        assert!(state.pending.is_none());
        assert!(state.conversion.is_none());
        assert!(!state.backend_missing);
        assert_eq!(state.messages[0].kind, MessageKind::Error);
        assert!(state.messages[0].text.starts_with("Error converting file"));
    }

    #[test]
    fn backend_error_offers_install_command() {
        let mut state = AppState::default();
        state.finish_conversion(Err(ConvertError::BackendUnavailable), "Loaded");

        assert!(state.backend_missing);
        assert!(
            state
                .messages
                .iter()
                .any(|m| m.text.contains(&state.config.install.display()))
        );
    }

    #[test]
    fn unauthorized_fetch_gets_credential_headline() {
        let mut state = AppState::default();
        let err = ConvertError::HttpStatus {
            status: 401,
            reason: "Unauthorized".into(),
            body_preview: String::new(),
        };
        state.finish_conversion(Err(err), "Downloaded and loaded");

        assert_eq!(state.messages[0].kind, MessageKind::Error);
        assert!(state.messages[0].text.starts_with("401 Unauthorized"));
        assert!(state.messages[1..].iter().any(|m| m.text.contains("presigned URL (S3)")));
        assert!(state.messages.iter().all(|m| !m.text.is_empty()));
    }

    #[test]
    fn status_error_shows_body_preview() {
        let mut state = AppState::default();
        let err = ConvertError::HttpStatus {
            status: 404,
            reason: "Not Found".into(),
            body_preview: "<Error>NoSuchKey</Error>".into(),
        };
        state.finish_conversion(Err(err), "Downloaded and loaded");

        assert_eq!(state.messages[0].text, "Error converting file: HTTP 404: Not Found");
        assert_eq!(
            state.messages[1],
            Message::new(MessageKind::Info, "<Error>NoSuchKey</Error>")
        );
        assert!(state.conversion.is_none());
        assert!(!state.backend_missing);
    }

    #[test]
    fn html_payload_shows_preview() {
        let mut state = AppState::default();
        let err = ConvertError::UnexpectedContent {
            content_type: "text/html".into(),
            preview: "<html><body>Sign in</body></html>".into(),
        };
        state.finish_conversion(Err(err), "Downloaded and loaded");

        assert_eq!(state.messages[0].kind, MessageKind::Error);
        assert!(state.messages[0].text.contains("URL returned HTML"));
        assert_eq!(state.messages[1].text, "<html><body>Sign in</body></html>");
        assert!(state.messages[2].text.contains("points directly"));
    }

    #[cfg(feature = "laz")]
    #[test]
    fn upload_then_switch_format_then_save() {
        use crate::data::decoder::tests::laz_bytes;

        let mut state = AppState::default();
        state.queue(Action::Upload {
            name: "tile.laz".into(),
            bytes: laz_bytes(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]),
        });
        state.run_pending();

        let conversion = state.conversion.as_ref().unwrap();
        assert_eq!(conversion.table.file_name, "tile.csv");
        assert_eq!(state.messages[0].text, "Loaded 2 points successfully");

        state.set_output_format(ExportFormat::Xyz);
        let table = &state.conversion.as_ref().unwrap().table;
        assert_eq!(table.file_name, "tile.xyz");
        assert_eq!(table.bytes, b"1.000 2.000 3.000\n4.000 5.000 6.000");

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("tile.xyz");
        state.save_export(&out);
        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            "1.000 2.000 3.000\n4.000 5.000 6.000"
        );
    }

    #[cfg(unix)]
    #[test]
    fn install_action_reports_outcome() {
        let mut state = AppState::default();
        state.backend_missing = true;
        state.config.install.program = "true".into();
        state.config.install.args.clear();
        state.queue(Action::InstallBackend);
        state.run_pending();

        assert!(!state.backend_missing);
        assert_eq!(state.messages[0].kind, MessageKind::Success);
    }
}
