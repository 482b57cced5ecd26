//! Interactive admin console.
//!
//! A prompt loop over [`AdminConsole`]: log in, then browse folders, edit
//! them, and manage each folder's images until the operator logs out.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Password, Select};

use folio_core::config::AppConfig;
use folio_core::error::{AppError, ErrorKind};
use folio_core::types::SortDirection;
use folio_entity::Folder;
use folio_service::{AdminConsole, AdminView, FolderForm, LoginError};

use super::prompt_error;
use crate::output;

/// Start the console. Returns when the operator logs out.
pub async fn execute(config: AppConfig) -> Result<(), AppError> {
    let ctx = super::connect(config).await?;
    let mut console = ctx.console();

    if !log_in(&mut console)? {
        return Ok(());
    }

    loop {
        let step = match console.view().clone() {
            AdminView::List => list_view(&mut console).await,
            AdminView::Form(form) => form_view(&mut console, &form).await,
            AdminView::Images(_) => images_view(&mut console).await,
        };
        match step {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.kind == ErrorKind::Authentication => {
                output::print_warning(&e.message);
                if !log_in(&mut console)? {
                    break;
                }
            }
            Err(e) => output::print_error(&e.to_string()),
        }
    }

    console.logout().await;
    output::print_success("Logged out");
    Ok(())
}

/// Prompt until login succeeds. `false` when the operator gives up.
fn log_in(console: &mut AdminConsole) -> Result<bool, AppError> {
    for _ in 0..3 {
        let password = Password::new()
            .with_prompt("Admin password")
            .interact()
            .map_err(prompt_error)?;
        if console.login(&password)? {
            output::print_success("Logged in");
            return Ok(true);
        }
        if console.login_error() == Some(LoginError::WrongPassword) {
            output::print_error("Wrong password");
        }
    }
    Ok(false)
}

fn choose(prompt: &str, items: &[String]) -> Result<usize, AppError> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(prompt_error)
}

fn folder_label(folder: &Folder) -> String {
    format!("{} ({} images)", folder.name, folder.image_count())
}

async fn list_view(console: &mut AdminConsole) -> Result<bool, AppError> {
    let listing = console.folders(SortDirection::Asc).await?;
    if let Some(error) = &listing.error {
        output::print_error(&format!("Could not load folders: {error}"));
    }
    if !console.search().is_empty() {
        output::print_kv("Filter", console.search());
    }

    let mut items: Vec<String> = listing.folders.iter().map(folder_label).collect();
    let actions = ["+ New folder", "/ Search", "Log out"];
    items.extend(actions.iter().map(|a| a.to_string()));

    let index = choose("Folders", &items)?;
    let folder_count = listing.folders.len();
    if index < folder_count {
        let folder = &listing.folders[index];
        return folder_menu(console, folder).await;
    }

    match index - folder_count {
        0 => console.open_create_form()?,
        1 => {
            let query: String = Input::new()
                .with_prompt("Search (blank for all)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;
            console.set_search(query);
        }
        _ => return Ok(false),
    }
    Ok(true)
}

async fn folder_menu(console: &mut AdminConsole, folder: &Folder) -> Result<bool, AppError> {
    let items = ["Images", "Rename", "Delete", "Back"].map(String::from);
    match choose(&folder.name, &items)? {
        0 => console.open_images(folder.id.clone())?,
        1 => console.open_edit_form(folder.id.clone())?,
        2 => {
            let confirm = Confirm::new()
                .with_prompt(format!(
                    "Delete '{}' and its {} image(s)?",
                    folder.name,
                    folder.image_count()
                ))
                .default(false)
                .interact()
                .map_err(prompt_error)?;
            if confirm {
                console.delete_folder(&folder.id).await?;
                output::print_success(&format!("Deleted '{}'", folder.name));
            }
        }
        _ => {}
    }
    Ok(true)
}

async fn form_view(console: &mut AdminConsole, form: &FolderForm) -> Result<bool, AppError> {
    let prompt = match form {
        FolderForm::Create => "New folder name",
        FolderForm::Edit(_) => "New name",
    };
    let name: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;

    if name.trim().is_empty() {
        console.back_to_list();
        return Ok(true);
    }
    let folder = console.submit_form(&name).await?;
    output::print_success(&format!("Saved '{}'", folder.name));
    Ok(true)
}

async fn images_view(console: &mut AdminConsole) -> Result<bool, AppError> {
    let folder = match console.open_folder_images().await {
        Ok(folder) => folder,
        Err(e) if e.kind == ErrorKind::NotFound => {
            output::print_warning("Folder no longer exists");
            console.back_to_list();
            return Ok(true);
        }
        Err(e) => return Err(e),
    };

    for (i, image) in folder.images.iter().enumerate() {
        output::print_kv(&format!("#{}", i + 1), &image.url);
    }

    let items = ["Upload files", "Add by URL", "Delete an image", "Back"].map(String::from);
    match choose(&folder.name, &items)? {
        0 => {
            let raw: String = Input::new()
                .with_prompt("File paths (space separated)")
                .interact_text()
                .map_err(prompt_error)?;
            let paths: Vec<PathBuf> = raw.split_whitespace().map(PathBuf::from).collect();
            let files = super::image::read_files(&paths).await?;
            let report = console.upload(files).await?;
            output::print_success(&format!("Uploaded {} file(s)", report.uploaded.len()));
            if let Some(failure) = report.failure {
                output::print_error(&format!(
                    "Stopped at '{}': {}",
                    failure.file_name, failure.error
                ));
            }
        }
        1 => {
            let url: String = Input::new()
                .with_prompt("Image URL")
                .interact_text()
                .map_err(prompt_error)?;
            console.add_url(&url).await?;
            output::print_success("Image added");
        }
        2 if folder.images.is_empty() => output::print_warning("No images to delete"),
        2 => {
            let labels: Vec<String> = folder.images.iter().map(|i| i.url.clone()).collect();
            let index = choose("Delete which image?", &labels)?;
            console.delete_image(&folder.images[index].id).await?;
            output::print_success("Image deleted");
        }
        _ => console.back_to_list(),
    }
    Ok(true)
}
