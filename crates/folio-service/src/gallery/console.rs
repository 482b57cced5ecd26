//! Admin panel state.
//!
//! The console tracks who is logged in, which panel is open, and the
//! current search. All data access goes through the shared
//! [`GalleryStore`], so the console never holds its own copy of the
//! folders.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use folio_auth::AdminAuthenticator;
use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::types::{FolderId, ImageId, SortDirection};
use folio_entity::{Folder, Image, UpdateFolder, UploadFile};

use super::service::UploadReport;
use super::store::{GalleryStore, Listing};

/// Login state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No valid token.
    LoggedOut,
    /// Holding an admin token.
    LoggedIn {
        /// Bearer token.
        token: String,
        /// Token expiry.
        expires_at: DateTime<Utc>,
    },
}

/// Which folder form is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FolderForm {
    /// New folder.
    Create,
    /// Rename an existing folder.
    Edit(FolderId),
}

/// The open panel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum AdminView {
    /// Folder list.
    #[default]
    List,
    /// Folder create/edit form.
    Form(FolderForm),
    /// Image manager for one folder.
    Images(FolderId),
}

/// Last failed login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoginError {
    /// The password did not match.
    WrongPassword,
}

/// Admin panel view state.
#[derive(Debug)]
pub struct AdminConsole {
    auth: Arc<AdminAuthenticator>,
    store: Arc<GalleryStore>,
    state: AuthState,
    view: AdminView,
    search: String,
    login_error: Option<LoginError>,
    uploading: bool,
}

impl AdminConsole {
    /// A logged-out console on the folder list.
    pub fn new(auth: Arc<AdminAuthenticator>, store: Arc<GalleryStore>) -> Self {
        Self {
            auth,
            store,
            state: AuthState::LoggedOut,
            view: AdminView::List,
            search: String::new(),
            login_error: None,
            uploading: false,
        }
    }

    /// Current login state.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Whether a non-expired token is held.
    pub fn is_authenticated(&self) -> bool {
        matches!(&self.state, AuthState::LoggedIn { expires_at, .. } if *expires_at > Utc::now())
    }

    /// The held token, if any.
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            AuthState::LoggedIn { token, .. } => Some(token),
            AuthState::LoggedOut => None,
        }
    }

    /// Current panel.
    pub fn view(&self) -> &AdminView {
        &self.view
    }

    /// Current search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Last failed login, cleared by the next attempt.
    pub fn login_error(&self) -> Option<LoginError> {
        self.login_error
    }

    /// Whether an upload batch is running.
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Attempt a login. Returns `Ok(false)` for a wrong password, leaving
    /// the console logged out with [`LoginError::WrongPassword`] set.
    pub fn login(&mut self, password: &str) -> AppResult<bool> {
        self.login_error = None;
        match self.auth.login(password) {
            Ok(issued) => {
                self.state = AuthState::LoggedIn {
                    token: issued.token,
                    expires_at: issued.expires_at,
                };
                self.view = AdminView::List;
                Ok(true)
            }
            Err(e) if e.kind == ErrorKind::Authentication => {
                self.login_error = Some(LoginError::WrongPassword);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Revoke the token and reset every piece of panel state.
    pub async fn logout(&mut self) {
        if let AuthState::LoggedIn { token, .. } = &self.state {
            if let Err(e) = self.auth.logout(token).await {
                warn!(error = %e, "Token revocation failed during logout");
            }
            info!("Admin console logged out");
        }
        self.state = AuthState::LoggedOut;
        self.view = AdminView::List;
        self.search.clear();
        self.login_error = None;
        self.uploading = false;
    }

    fn require_login(&mut self) -> AppResult<()> {
        if self.is_authenticated() {
            return Ok(());
        }
        if matches!(self.state, AuthState::LoggedIn { .. }) {
            self.state = AuthState::LoggedOut;
            self.view = AdminView::List;
            return Err(AppError::authentication("Session expired; log in again"));
        }
        Err(AppError::authorization("Admin login required"))
    }

    /// Set the name filter.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Folders matching the current search.
    pub async fn folders(&mut self, direction: SortDirection) -> AppResult<Listing> {
        self.require_login()?;
        Ok(self.store.listing(direction, &self.search).await)
    }

    /// Open the empty folder form.
    pub fn open_create_form(&mut self) -> AppResult<()> {
        self.require_login()?;
        self.view = AdminView::Form(FolderForm::Create);
        Ok(())
    }

    /// Open the rename form for `id`.
    pub fn open_edit_form(&mut self, id: FolderId) -> AppResult<()> {
        self.require_login()?;
        self.view = AdminView::Form(FolderForm::Edit(id));
        Ok(())
    }

    /// Open the image manager for `id`.
    pub fn open_images(&mut self, id: FolderId) -> AppResult<()> {
        self.require_login()?;
        self.view = AdminView::Images(id);
        Ok(())
    }

    /// Return to the folder list.
    pub fn back_to_list(&mut self) {
        self.view = AdminView::List;
    }

    /// Submit the open folder form. On success the list is shown again.
    pub async fn submit_form(&mut self, name: &str) -> AppResult<Folder> {
        self.require_login()?;
        let folder = match &self.view {
            AdminView::Form(FolderForm::Create) => self.store.create_folder(name).await?,
            AdminView::Form(FolderForm::Edit(id)) => {
                self.store
                    .update_folder(id, UpdateFolder::rename(name))
                    .await?
            }
            _ => return Err(AppError::validation("No folder form is open")),
        };
        self.view = AdminView::List;
        Ok(folder)
    }

    /// Delete a folder and everything in it.
    pub async fn delete_folder(&mut self, id: &FolderId) -> AppResult<()> {
        self.require_login()?;
        self.store.delete_folder(id).await?;
        if matches!(&self.view, AdminView::Images(open) | AdminView::Form(FolderForm::Edit(open)) if open == id)
        {
            self.view = AdminView::List;
        }
        Ok(())
    }

    fn open_folder(&self) -> AppResult<FolderId> {
        match &self.view {
            AdminView::Images(id) => Ok(id.clone()),
            _ => Err(AppError::validation("No folder is open")),
        }
    }

    /// The folder whose images are open, with its images.
    pub async fn open_folder_images(&mut self) -> AppResult<Folder> {
        self.require_login()?;
        let id = self.open_folder()?;
        self.store.get_folder(&id).await
    }

    /// Upload files into the open folder.
    pub async fn upload(&mut self, files: Vec<UploadFile>) -> AppResult<UploadReport> {
        self.require_login()?;
        let id = self.open_folder()?;
        self.uploading = true;
        let result = self.store.upload_images(&id, files).await;
        self.uploading = false;
        result
    }

    /// Add an external image to the open folder.
    pub async fn add_url(&mut self, url: &str) -> AppResult<Image> {
        self.require_login()?;
        let id = self.open_folder()?;
        self.store.add_image_url(&id, url, 0).await
    }

    /// Delete one image.
    pub async fn delete_image(&mut self, id: &ImageId) -> AppResult<()> {
        self.require_login()?;
        self.store.delete_image(id).await
    }
}
