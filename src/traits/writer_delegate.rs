use crate::models::error::RecordError;

/// Lifecycle observer for a writer coordinator.
///
/// All methods are delivered on the serial queue supplied at registration,
/// in order, never from inside the coordinator's locked regions. For one
/// attempt, `writer_did_finish_preparing` is never delivered after either
/// terminal notification.
pub trait WriterDelegate: Send + Sync {
    /// The sink is provisioned and open; appends are now accepted.
    fn writer_did_finish_preparing(&self);

    /// The attempt failed; the partial artifact has been scheduled for
    /// deletion.
    fn writer_did_fail(&self, error: RecordError);

    /// The artifact was finalized and is retained at the output location.
    fn writer_did_finish_recording(&self);
}
