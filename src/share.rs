use crate::{
    config::ShareConfig,
    message::ShareMessage,
    platform::{
        Capability, Clipboard, ClipboardError, NativeShare, Page, PageError, Platform,
        ShareOutcome,
    },
    score::ScoreSnapshot,
};

/// How a share ended up reaching the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The native share sheet was shown, and either used or dismissed.
    NativeShare,

    /// The link was copied and the user told so.
    Clipboard,

    /// The link was shown in a prompt for the user to copy.
    Prompt,
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("couldn't read the score page: {0}")]
    Page(#[from] PageError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

pub struct ShareAction<P> {
    platform: P,
    config: ShareConfig,
}

impl<P: Platform> ShareAction<P> {
    pub fn new(platform: P, config: ShareConfig) -> Self {
        Self { platform, config }
    }

    /// Builds the message from what `page` displays right now.
    pub fn compose_message(&self, page: &impl Page) -> Result<ShareMessage, PageError> {
        let snapshot = ScoreSnapshot::read(page, &self.config.selectors)?;
        let url = page.location()?;

        Ok(ShareMessage::compose(&self.config.site.title, &snapshot, url))
    }

    /// Hands `message` to the native share sheet.
    ///
    /// Returns `true` once the sheet has been dealt with, including when the user dismissed
    /// it. `false` means another delivery should be tried.
    #[tracing::instrument(skip_all)]
    pub async fn try_native_share(&self, message: &ShareMessage) -> bool {
        let Capability::Available(share) = self.platform.native_share() else {
            tracing::debug!("native share unavailable");
            return false;
        };

        if !share.can_share(message) {
            tracing::debug!("native share refused the payload");
            return false;
        }

        match share.share(message).await {
            ShareOutcome::Shared => {
                tracing::info!("shared through the native share sheet");
                true
            }
            ShareOutcome::Cancelled => {
                tracing::info!("user dismissed the native share sheet");
                true
            }
            ShareOutcome::Failed(reason) => {
                tracing::warn!(%reason, "native share failed");
                false
            }
        }
    }

    /// Shares the score shown on `page`, trying each delivery in turn.
    ///
    /// Exactly one delivery reaches the user: the native share sheet, the clipboard with
    /// a notice, or a prompt containing the link.
    #[tracing::instrument(skip_all)]
    pub async fn share(&self, page: &impl Page) -> Result<Delivery, ShareError> {
        let message = self.compose_message(page)?;
        tracing::debug!(url = %message.url, "composed share message");

        if self.try_native_share(&message).await {
            return Ok(Delivery::NativeShare);
        }

        let activation = self.platform.user_activation();

        match self.platform.clipboard() {
            Capability::Available(clipboard) if activation.is_active() => {
                clipboard.write_text(message.url.as_str()).await?;
                self.platform.notify(&self.config.notices.copied);

                tracing::info!("copied link to clipboard");
                Ok(Delivery::Clipboard)
            }
            clipboard => {
                tracing::debug!(
                    clipboard = clipboard.is_available(),
                    ?activation,
                    "can't use the clipboard"
                );

                self.platform
                    .prompt(&self.config.notices.prompt, message.url.as_str());

                tracing::info!("prompted user with link");
                Ok(Delivery::Prompt)
            }
        }
    }
}
