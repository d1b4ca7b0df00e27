use anyhow::{Result, bail};
use tokio::sync::mpsc::UnboundedReceiver;

use lexrag_application::{SessionController, SubmitOutcome};
use lexrag_core::notice::Notice;

use crate::render;

/// One question, one answer. Exits non-zero when the backend fails.
pub async fn run(
    session: &SessionController,
    mut notices: UnboundedReceiver<Notice>,
    question: &str,
) -> Result<()> {
    let outcome = session.submit_question(question).await;
    render::drain_notices(&mut notices);
    match outcome {
        SubmitOutcome::Answered(reply) => {
            render::message(&reply);
            Ok(())
        }
        SubmitOutcome::Failed(reply) => bail!("{}", reply.content),
        SubmitOutcome::Ignored(reason) => bail!("Question ignored: {reason}"),
    }
}
