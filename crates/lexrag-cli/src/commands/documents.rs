use anyhow::{Result, bail};

use lexrag_application::SessionController;

use crate::render;

pub async fn run(session: &SessionController) -> Result<()> {
    if !session.load_library().await {
        bail!(
            "Could not load documents. Make sure the backend is running on {}",
            session.config().backend_url
        );
    }
    render::documents(&session.documents().await);
    Ok(())
}
