//! Editing session state machine.
//!
//! A session is either empty (no file yet) or editing one decoded image.
//! Events from the UI move it between states via [`EditorSession::handle`];
//! an event that makes no sense in the current state is ignored.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EditorConfig;
use crate::controls::{fit_ratio, ResizeControl};
use crate::decode::DecodedImage;
use crate::encode::OutputFormat;
use crate::export::{export_image, file_stem, ExportError, ExportRequest, ExportedFile};
use crate::transform::{Flip, PixelCrop};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 3.0;

/// Crop widget pan position, in widget units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropPosition {
    pub x: f64,
    pub y: f64,
}

/// State while a file is loaded.
#[derive(Debug, Clone)]
pub struct EditingState {
    image: Arc<DecodedImage>,
    file_stem: String,
    position: CropPosition,
    zoom: f64,
    rotation: f64,
    flip: Flip,
    crop: Option<PixelCrop>,
    resize: ResizeControl,
    original: (u32, u32),
    close_pending: bool,
}

impl EditingState {
    fn new(file_name: &str, image: DecodedImage) -> Self {
        let original = (image.width, image.height);
        Self {
            image: Arc::new(image),
            file_stem: file_stem(file_name),
            position: CropPosition::default(),
            zoom: MIN_ZOOM,
            rotation: 0.0,
            flip: Flip::NONE,
            crop: None,
            resize: ResizeControl::new(original.0, original.1),
            original,
            close_pending: false,
        }
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    pub fn position(&self) -> CropPosition {
        self.position
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn flip(&self) -> Flip {
        self.flip
    }

    /// Last crop reported by the widget, in rotated bounding-box pixels.
    pub fn crop(&self) -> Option<PixelCrop> {
        self.crop
    }

    pub fn resize(&self) -> &ResizeControl {
        &self.resize
    }

    pub fn target_dimensions(&self) -> (u32, u32) {
        self.resize.dimensions()
    }

    pub fn original_dimensions(&self) -> (u32, u32) {
        self.original
    }

    /// Whether a close confirmation prompt is showing.
    pub fn close_pending(&self) -> bool {
        self.close_pending
    }

    /// Aspect ratio the crop widget should enforce.
    pub fn widget_aspect(&self) -> Option<f64> {
        match self.resize.dimensions() {
            (w, h) if w > 0 && h > 0 => Some(w as f64 / h as f64),
            _ => None,
        }
    }

    fn reset_framing(&mut self) {
        self.position = CropPosition::default();
        self.zoom = MIN_ZOOM;
    }
}

/// UI events that drive the session.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// A file was dropped or picked and decoded successfully.
    FileAccepted { file_name: String, image: DecodedImage },
    CropMoved(CropPosition),
    ZoomChanged(f64),
    RotationChanged(f64),
    FlipChanged(Flip),
    /// The widget finished an interaction and reported the crop rectangle.
    CropCompleted(PixelCrop),
    /// Both target dimensions set at once.
    DimensionsChanged { width: u32, height: u32 },
    /// Raw text typed into the width field.
    WidthEdited(String),
    /// Raw text typed into the height field.
    HeightEdited(String),
    AspectLockToggled,
    /// A preset or custom aspect ratio (width / height) was applied.
    RatioSelected(f64),
    Reset,
    CloseRequested,
    CloseConfirmed,
    CloseCancelled,
}

/// The editor's top-level state.
#[derive(Debug, Clone, Default)]
pub enum EditorSession {
    #[default]
    Empty,
    Editing(EditingState),
}

impl EditorSession {
    pub fn new() -> Self {
        Self::Empty
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    pub fn editing(&self) -> Option<&EditingState> {
        match self {
            Self::Editing(state) => Some(state),
            Self::Empty => None,
        }
    }

    /// Aspect ratio for the crop widget, or `None` for free-form.
    pub fn widget_aspect(&self) -> Option<f64> {
        self.editing().and_then(EditingState::widget_aspect)
    }

    /// Whether [`export`](Self::export) has everything it needs.
    pub fn can_export(&self) -> bool {
        self.editing().is_some_and(|s| s.crop.is_some())
    }

    /// Apply one event and return the next state.
    pub fn handle(self, event: EditorEvent) -> Self {
        match (self, event) {
            (_, EditorEvent::FileAccepted { file_name, image }) => {
                debug!(%file_name, width = image.width, height = image.height, "file accepted");
                Self::Editing(EditingState::new(&file_name, image))
            }
            (Self::Empty, event) => {
                debug!(?event, "ignored without a file");
                Self::Empty
            }
            (Self::Editing(state), EditorEvent::CloseConfirmed) if state.close_pending => {
                debug!("session closed");
                Self::Empty
            }
            (Self::Editing(mut state), event) => {
                state.apply(event);
                Self::Editing(state)
            }
        }
    }

    /// Build the export request for the current state and run it.
    ///
    /// The session is only read, so a failed export leaves it unchanged.
    ///
    /// # Errors
    ///
    /// `NoCrop` without a file or before the widget reported a crop;
    /// otherwise whatever the pipeline reports.
    pub fn export(
        &self,
        format: OutputFormat,
        config: &EditorConfig,
    ) -> Result<ExportedFile, ExportError> {
        let state = self.editing().ok_or(ExportError::NoCrop)?;
        let crop = state.crop.ok_or(ExportError::NoCrop)?;
        let (target_width, target_height) = state.target_dimensions();

        let request = ExportRequest {
            crop,
            rotation: state.rotation,
            flip: state.flip,
            target_width,
            target_height,
            format,
            file_stem: state.file_stem.clone(),
        };
        export_image(&state.image, &request, config)
    }
}

impl EditingState {
    fn apply(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::CropMoved(position) => {
                if position.x.is_finite() && position.y.is_finite() {
                    self.position = position;
                }
            }
            EditorEvent::ZoomChanged(zoom) => {
                if zoom.is_finite() {
                    self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
                }
            }
            EditorEvent::RotationChanged(degrees) => {
                if degrees.is_finite() {
                    self.rotation = degrees;
                }
            }
            EditorEvent::FlipChanged(flip) => self.flip = flip,
            EditorEvent::CropCompleted(crop) => self.crop = Some(crop),
            EditorEvent::DimensionsChanged { width, height } => {
                if width > 0 && height > 0 {
                    self.resize.sync(width, height);
                }
            }
            EditorEvent::WidthEdited(text) => {
                self.resize.set_width_input(&text);
            }
            EditorEvent::HeightEdited(text) => {
                self.resize.set_height_input(&text);
            }
            EditorEvent::AspectLockToggled => self.resize.toggle_lock(),
            EditorEvent::RatioSelected(ratio) => {
                if let Some((w, h)) = fit_ratio(self.original.0, self.original.1, ratio) {
                    debug!(ratio, width = w, height = h, "aspect ratio applied");
                    self.resize.sync(w, h);
                    self.reset_framing();
                }
            }
            EditorEvent::Reset => {
                debug!("edits reset");
                self.reset_framing();
                self.rotation = 0.0;
                self.flip = Flip::NONE;
                self.resize.sync(self.original.0, self.original.1);
            }
            EditorEvent::CloseRequested => self.close_pending = true,
            EditorEvent::CloseCancelled | EditorEvent::CloseConfirmed => {
                self.close_pending = false;
            }
            EditorEvent::FileAccepted { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::SurfaceLimits;

    fn image(width: u32, height: u32) -> DecodedImage {
        let pixels = [10u8, 20, 30, 255].repeat((width * height) as usize);
        DecodedImage::new(width, height, pixels)
    }

    fn resized(width: u32, height: u32) -> EditorEvent {
        EditorEvent::DimensionsChanged { width, height }
    }

    fn loaded(width: u32, height: u32) -> EditorSession {
        EditorSession::new().handle(EditorEvent::FileAccepted {
            file_name: "beach.photo.jpg".to_string(),
            image: image(width, height),
        })
    }

    fn state(session: &EditorSession) -> &EditingState {
        session.editing().unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let session = EditorSession::new();
        assert!(!session.is_editing());
        assert!(!session.can_export());
        assert_eq!(session.widget_aspect(), None);
    }

    #[test]
    fn test_file_accepted_initializes_state() {
        let session = loaded(1000, 500);
        let s = state(&session);
        assert_eq!(s.file_stem(), "beach.photo");
        assert_eq!(s.target_dimensions(), (1000, 500));
        assert_eq!(s.original_dimensions(), (1000, 500));
        assert_eq!(s.zoom(), 1.0);
        assert_eq!(s.rotation(), 0.0);
        assert_eq!(s.crop(), None);
        assert_eq!(session.widget_aspect(), Some(2.0));
    }

    #[test]
    fn test_events_ignored_when_empty() {
        let session = EditorSession::new()
            .handle(EditorEvent::ZoomChanged(2.0))
            .handle(EditorEvent::RatioSelected(1.0))
            .handle(EditorEvent::CloseRequested);
        assert!(!session.is_editing());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let session = loaded(100, 100).handle(EditorEvent::ZoomChanged(5.0));
        assert_eq!(state(&session).zoom(), MAX_ZOOM);

        let session = session.handle(EditorEvent::ZoomChanged(0.2));
        assert_eq!(state(&session).zoom(), MIN_ZOOM);

        let session = session
            .handle(EditorEvent::ZoomChanged(2.5))
            .handle(EditorEvent::ZoomChanged(f64::NAN));
        assert_eq!(state(&session).zoom(), 2.5);
    }

    #[test]
    fn test_ratio_selected_fits_and_resets_framing() {
        let session = loaded(1000, 500)
            .handle(EditorEvent::CropMoved(CropPosition {
                x: 12.0,
                y: -4.0,
            }))
            .handle(EditorEvent::ZoomChanged(2.0))
            .handle(EditorEvent::RotationChanged(30.0))
            .handle(EditorEvent::RatioSelected(1.0));

        let s = state(&session);
        assert_eq!(s.target_dimensions(), (500, 500));
        assert_eq!(s.position(), CropPosition::default());
        assert_eq!(s.zoom(), 1.0);
        assert_eq!(s.rotation(), 30.0);
        assert_eq!(session.widget_aspect(), Some(1.0));
    }

    #[test]
    fn test_ratio_fits_against_original_not_target() {
        let session = loaded(400, 800)
            .handle(EditorEvent::RatioSelected(1.0))
            .handle(EditorEvent::RatioSelected(16.0 / 9.0));
        assert_eq!(state(&session).target_dimensions(), (400, 225));
    }

    #[test]
    fn test_invalid_ratio_ignored() {
        let session = loaded(300, 200).handle(EditorEvent::RatioSelected(0.0));
        assert_eq!(state(&session).target_dimensions(), (300, 200));
    }

    #[test]
    fn test_width_edit_respects_lock() {
        let session = loaded(1000, 500).handle(EditorEvent::WidthEdited("400".into()));
        assert_eq!(state(&session).target_dimensions(), (400, 200));

        let session = session
            .handle(EditorEvent::AspectLockToggled)
            .handle(EditorEvent::HeightEdited("50".into()));
        assert_eq!(state(&session).target_dimensions(), (400, 50));
        assert_eq!(session.widget_aspect(), Some(8.0));
    }

    #[test]
    fn test_invalid_dimensions_ignored() {
        let session = loaded(640, 480)
            .handle(EditorEvent::WidthEdited("".into()))
            .handle(EditorEvent::HeightEdited("abc".into()))
            .handle(resized(0, 10));
        assert_eq!(state(&session).target_dimensions(), (640, 480));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let session = loaded(800, 600)
            .handle(EditorEvent::RotationChanged(45.0))
            .handle(EditorEvent::ZoomChanged(3.0))
            .handle(EditorEvent::FlipChanged(Flip {
                horizontal: true,
                vertical: false,
            }))
            .handle(resized(100, 100))
            .handle(EditorEvent::Reset);

        let s = state(&session);
        assert_eq!(s.rotation(), 0.0);
        assert_eq!(s.zoom(), 1.0);
        assert_eq!(s.flip(), Flip::NONE);
        assert_eq!(s.target_dimensions(), (800, 600));
    }

    #[test]
    fn test_close_requires_confirmation() {
        let session = loaded(10, 10).handle(EditorEvent::CloseConfirmed);
        assert!(session.is_editing());

        let session = session.handle(EditorEvent::CloseRequested);
        assert!(state(&session).close_pending());

        let session = session.handle(EditorEvent::CloseCancelled);
        assert!(session.is_editing());
        assert!(!state(&session).close_pending());

        let session = session
            .handle(EditorEvent::CloseRequested)
            .handle(EditorEvent::CloseConfirmed);
        assert!(!session.is_editing());
    }

    #[test]
    fn test_new_file_replaces_current() {
        let session = loaded(100, 50)
            .handle(EditorEvent::RotationChanged(90.0))
            .handle(EditorEvent::FileAccepted {
                file_name: "next.png".to_string(),
                image: image(20, 30),
            });
        let s = state(&session);
        assert_eq!(s.file_stem(), "next");
        assert_eq!(s.rotation(), 0.0);
        assert_eq!(s.target_dimensions(), (20, 30));
    }

    #[test]
    fn test_export_requires_crop() {
        let config = EditorConfig::default();
        assert!(matches!(
            EditorSession::new().export(OutputFormat::Png, &config),
            Err(ExportError::NoCrop)
        ));
        assert!(matches!(
            loaded(10, 10).export(OutputFormat::Png, &config),
            Err(ExportError::NoCrop)
        ));
    }

    #[test]
    fn test_export_uses_session_state() {
        let session = loaded(800, 600)
            .handle(EditorEvent::CropCompleted(PixelCrop::new(100.0, 50.0, 400.0, 400.0)))
            .handle(resized(300, 300));
        assert!(session.can_export());

        let file = session.export(OutputFormat::Png, &EditorConfig::default()).unwrap();
        assert_eq!(file.file_name, "beach.photo-edited.png");
        assert_eq!((file.width, file.height), (300, 300));
    }

    #[test]
    fn test_failed_export_leaves_state_untouched() {
        let session = loaded(50, 50)
            .handle(EditorEvent::CropCompleted(PixelCrop::new(0.0, 0.0, 50.0, 50.0)))
            .handle(resized(4000, 4000));
        let config = EditorConfig {
            surface: SurfaceLimits {
                max_dimension: 1000,
                max_area: 1_000_000,
            },
            ..EditorConfig::default()
        };

        assert!(matches!(
            session.export(OutputFormat::Jpeg, &config),
            Err(ExportError::Surface(_))
        ));
        let s = state(&session);
        assert_eq!(s.target_dimensions(), (4000, 4000));
        assert!(s.crop().is_some());

        // Retrying with a workable size succeeds from the same state
        let session = session.handle(resized(100, 100));
        assert!(session.export(OutputFormat::Jpeg, &config).is_ok());
    }
}
