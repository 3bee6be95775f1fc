//! Visualization events and the dismissal handshake.
//!
//! A successful render produces exactly one [`VisualizationEvent`] on
//! the viewer channel. The event carries the rendered artifact and a
//! [`DismissTicket`]; the block execution that requested the render
//! stays suspended until the ticket is used (or dropped). Tickets are
//! consumed by [`DismissTicket::dismiss`], so a viewer cannot resume
//! the same request twice.

use tokio::sync::oneshot;

/// The kind of rendered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Bar chart of an outcome distribution.
    Histogram,
    /// Diagram of the accumulated circuit.
    CircuitDiagram,
}

impl ArtifactKind {
    /// Get a short display name for the artifact kind.
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Histogram => "histogram",
            ArtifactKind::CircuitDiagram => "circuit-diagram",
        }
    }
}

/// A rendered image artifact returned by the render service.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// What the image depicts.
    pub kind: ArtifactKind,
    /// Base64-encoded PNG data.
    pub image_base64: String,
}

/// One render-and-dismiss exchange with a viewer.
///
/// Transient: exists only between "render succeeded" and "viewer
/// dismissed".
#[derive(Debug)]
pub struct VisualizationEvent {
    /// The artifact to display.
    pub artifact: Artifact,
    /// Resumption handle for the suspended requester.
    pub ticket: DismissTicket,
}

/// Resumption handle carried by a [`VisualizationEvent`].
///
/// Holding the ticket keeps the originating block execution suspended.
/// [`DismissTicket::dismiss`] consumes the ticket and resumes it;
/// dropping the ticket resumes it too, so a viewer that goes away
/// cannot strand the requester.
#[derive(Debug)]
pub struct DismissTicket {
    tx: oneshot::Sender<()>,
}

impl DismissTicket {
    /// Create a ticket and the receiver the requester awaits.
    pub(crate) fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Signal that the artifact has been dismissed, resuming the
    /// suspended requester. Consumes the ticket.
    pub fn dismiss(self) {
        let _ = self.tx.send(());
    }
}
