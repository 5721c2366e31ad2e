//! CLI module for the kinotes application
//!
//! This module turns parsed commands into note store operations and prints
//! the results.
use std::{
    fs::{read_to_string, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use chrono::{DateTime, Local};
use console::{style, Color, Style};
use log::{debug, info};
use shell_words::split;
use tempfile::Builder;

use crate::{
    analyze_note, content_preview, image_data_uri, parse_tags, terminal_prefers_dark,
    validate_fields, AuthGate, Commands, Config, CreativityClassifier, DisabledClassifier,
    FavoritesFilter, FileKeyValueStore, FilterState, HttpClassifier, KnError, Note, NoteColor,
    NoteDraft, NoteStore, OutputFormat, Result, SortBy, TagFilter, Theme, ThemePreference,
};

/// CLI Application handler - processes CLI commands against the note store
pub struct App {
    store: NoteStore<FileKeyValueStore>,
    auth: AuthGate<FileKeyValueStore>,
    theme: ThemePreference<FileKeyValueStore>,
    classifier: Box<dyn CreativityClassifier>,
    config: Config,
}

impl App {
    /// Opens the key-value store under the configured data directory and
    /// loads the note collection from it.
    pub fn new(config: Config) -> Result<Self> {
        let kv = FileKeyValueStore::open(&config.data_dir)?;
        info!("Using data directory {}", kv.dir().display());

        let classifier: Box<dyn CreativityClassifier> = match &config.classifier_endpoint {
            Some(endpoint) => Box::new(HttpClassifier::new(endpoint.clone())?),
            None => Box::new(DisabledClassifier),
        };

        Ok(Self {
            store: NoteStore::open(kv.clone(), config.undo_window()),
            auth: AuthGate::new(kv.clone()),
            theme: ThemePreference::new(kv),
            classifier,
            config,
        })
    }

    /// Run the CLI application with the given command
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { username, password } => self.handle_login(&username, &password),
            Commands::Logout => {
                self.auth.logout();
                println!("Logged out.");
                Ok(())
            }
            Commands::Theme { theme } => {
                self.handle_theme(theme);
                Ok(())
            }
            command => {
                self.auth.require()?;
                self.run_note_command(command).await
            }
        }
    }

    async fn run_note_command(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Create {
                title,
                content,
                file,
                tags,
                color,
                image,
                image_file,
                favorite,
            } => {
                let image_url = match image_file {
                    Some(path) => Some(image_data_uri(&path)?),
                    None => image,
                };
                let draft = NoteDraft {
                    color,
                    image_url,
                    is_favorite: favorite,
                    tags: Some(parse_tags(tags)),
                    ..NoteDraft::new(title.clone(), self.read_content(content, file, &title)?)
                };
                self.create_note(draft).await
            }

            Commands::Edit {
                id,
                title,
                content,
                file,
                edit,
                add_tags,
                remove_tags,
                color,
                image,
                image_file,
                clear_image,
            } => {
                let mut note = self
                    .store
                    .get(&id)
                    .cloned()
                    .ok_or(KnError::NoteNotFound { id })?;

                if let Some(new_title) = title {
                    note.title = new_title;
                }
                note.content = self.read_edited_content(&note, content, file, edit)?;

                let to_add = parse_tags(add_tags);
                let to_remove = parse_tags(remove_tags);
                note.tags.extend(to_add);
                note.tags.retain(|tag| !to_remove.contains(tag));

                if let Some(color) = color {
                    note.color = color;
                }
                if clear_image {
                    note.image_url = None;
                } else if let Some(path) = image_file {
                    note.image_url = Some(image_data_uri(&path)?);
                } else if image.is_some() {
                    note.image_url = image;
                }

                self.edit_note(note).await
            }

            Commands::Delete { id } => self.handle_delete(&id),

            Commands::Undo => {
                match self.store.restore_last_deleted() {
                    Some(note) => println!("Restored note '{}' ({})", note.title, note.id),
                    None => println!("Nothing to undo."),
                }
                Ok(())
            }

            Commands::Favorite { id } => {
                let is_favorite = self
                    .store
                    .toggle_favorite(&id)
                    .ok_or_else(|| KnError::NoteNotFound { id: id.clone() })?;
                if is_favorite {
                    println!("Added {} to favourites", id);
                } else {
                    println!("Removed {} from favourites", id);
                }
                Ok(())
            }

            Commands::List {
                search,
                favorites,
                tag,
                sort_by,
                limit,
                format,
                detailed,
            } => {
                let filter = FilterState {
                    search_query: search.unwrap_or_default(),
                    favorites: if favorites {
                        FavoritesFilter::Favorites
                    } else {
                        FavoritesFilter::All
                    },
                    tag: TagFilter::from(tag),
                    sort_by,
                };
                self.list_notes(&filter, limit, format, detailed)
            }

            Commands::Tags => {
                let tags = self.store.all_tags();
                if tags.is_empty() {
                    println!("No tags yet.");
                }
                for tag in tags {
                    println!("#{}", tag);
                }
                Ok(())
            }

            Commands::Reorder { ids } => {
                for id in &ids {
                    if !self.store.contains(id) {
                        return Err(KnError::NoteNotFound { id: id.clone() });
                    }
                }
                self.store.reorder_ids(ids.iter().map(String::as_str));
                println!("Moved {} notes to the front", ids.len());
                Ok(())
            }

            Commands::Login { .. } | Commands::Logout | Commands::Theme { .. } => Ok(()),
        }
    }

    fn handle_login(&self, username: &str, password: &str) -> Result<()> {
        if self.auth.login(username, password) {
            println!("Logged in as {}", username);
            Ok(())
        } else {
            Err(KnError::InvalidCredentials)
        }
    }

    fn handle_theme(&self, theme: Option<Theme>) {
        match theme {
            Some(theme) => {
                self.theme.save(theme);
                println!("Theme set to {}", theme);
            }
            None => {
                let theme = self.theme.load();
                println!(
                    "Theme: {} (resolved: {})",
                    theme,
                    theme.resolve(terminal_prefers_dark())
                );
            }
        }
    }

    async fn create_note(&mut self, draft: NoteDraft) -> Result<()> {
        draft.validate()?;

        let assessment = analyze_note(
            self.classifier.as_ref(),
            &draft.content,
            self.config.classifier_timeout(),
        )
        .await;
        let note = self.store.add(draft.with_assessment(assessment));

        println!("Note created with ID: {}", note.id);
        self.print_assessment(&note);
        Ok(())
    }

    async fn edit_note(&mut self, note: Note) -> Result<()> {
        validate_fields(&note.title, &note.content)?;

        let assessment = analyze_note(
            self.classifier.as_ref(),
            &note.content,
            self.config.classifier_timeout(),
        )
        .await;
        let note = note.with_assessment(assessment);
        let id = note.id.clone();

        // The note may have been removed while the classifier was running
        if !self.store.update(note) {
            return Err(KnError::NoteNotFound { id });
        }

        if let Some(note) = self.store.get(&id) {
            println!("Note {} updated successfully", note.id);
            self.print_assessment(note);
        }
        Ok(())
    }

    fn handle_delete(&mut self, id: &str) -> Result<()> {
        let note = self
            .store
            .delete(id)
            .ok_or_else(|| KnError::NoteNotFound { id: id.to_string() })?;

        println!("Note '{}' ({}) deleted.", note.title, note.id);
        println!(
            "Run `kinotes undo` within {} seconds to restore it.",
            self.config.undo_window_secs
        );
        Ok(())
    }

    fn print_assessment(&self, note: &Note) {
        if let Some(explanation) = &note.creativity_explanation {
            let marker = if note.is_creative == Some(true) {
                style("creative").yellow().bold()
            } else {
                style("not creative").dim()
            };
            println!("Creativity: {} - {}", marker, explanation);
        }
    }

    /// Content from `--content`, `--file`, or the editor, in that order.
    fn read_content(
        &self,
        content: Option<String>,
        file: Option<PathBuf>,
        title: &str,
    ) -> Result<String> {
        match (content, file) {
            (Some(c), _) => Ok(c),
            (_, Some(file_path)) => read_content_from_file(&file_path),
            (None, None) => self.open_editor(title, ""),
        }
    }

    fn read_edited_content(
        &self,
        note: &Note,
        content: Option<String>,
        file: Option<PathBuf>,
        open_editor: bool,
    ) -> Result<String> {
        let sources = [content.is_some(), file.is_some(), open_editor]
            .iter()
            .filter(|set| **set)
            .count();
        if sources > 1 {
            return Err(KnError::ApplicationError {
                message: "Use only one of --content, --file and --edit".to_string(),
            });
        }

        if let Some(content) = content {
            Ok(content)
        } else if let Some(file_path) = file {
            read_content_from_file(&file_path)
        } else if open_editor {
            self.open_editor(&note.title, &note.content)
        } else {
            Ok(note.content.clone())
        }
    }

    fn open_editor(&self, title: &str, existing_content: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        write_editor_template(&temp_path, title, existing_content)?;

        let editor_cmd = self.config.get_editor_command();
        info!("Opening editor to write note content. Save and exit when done...");
        launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(process_editor_content(&content))
    }

    fn list_notes(
        &self,
        filter: &FilterState,
        limit: usize,
        format: OutputFormat,
        detailed: bool,
    ) -> Result<()> {
        let mut notes = self.store.visible(filter);
        debug!("{} of {} notes visible", notes.len(), self.store.len());

        if limit > 0 && notes.len() > limit {
            notes.truncate(limit);
        }

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&notes)?),
            OutputFormat::Text => self.display_notes_text(&notes, filter.sort_by, detailed),
        }
        Ok(())
    }

    fn display_notes_text(&self, notes: &[&Note], sort_by: SortBy, detailed: bool) {
        if notes.is_empty() {
            println!("No notes found matching the criteria.");
            return;
        }

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            let (label, stamp) = match sort_by {
                SortBy::UpdatedAt => ("Updated", note.updated_at),
                SortBy::CreatedAt => ("Created", note.created_at),
            };
            println!("ID: {} | {}: {}", note.id, label, format_millis(stamp));

            let star = if note.is_favorite { "* " } else { "" };
            let title_style = color_style(note.color).bold();
            println!("{}{}", star, title_style.apply_to(&note.title));

            if !note.tags.is_empty() {
                let tags = note
                    .tags
                    .iter()
                    .map(|tag| format!("#{}", tag))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("Tags: {}", style(tags).cyan());
            }

            if let Some(image) = &note.image_url {
                println!("Image: {}", content_preview(image, term_width.saturating_sub(10)));
            }

            if detailed {
                println!("\n{}", note.content);
            } else {
                let preview = content_preview(&note.content, 100);
                if !preview.is_empty() {
                    println!("\n{}", preview);
                }
            }
        }

        println!(
            "\nFound {} note{}",
            notes.len(),
            if notes.len() == 1 { "" } else { "s" }
        );
    }
}

fn color_style(color: NoteColor) -> Style {
    let style = Style::new();
    match color {
        NoteColor::Default => style,
        NoteColor::Red => style.fg(Color::Red),
        NoteColor::Orange => style.fg(Color::Color256(208)),
        NoteColor::Yellow => style.fg(Color::Yellow),
        NoteColor::Green => style.fg(Color::Green),
        NoteColor::Teal => style.fg(Color::Cyan),
        NoteColor::Blue => style.fg(Color::Blue),
        NoteColor::Purple => style.fg(Color::Magenta),
    }
}

fn format_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn read_content_from_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(KnError::FileNotFound {
            file_path: path.display().to_string(),
        });
    }
    read_to_string(path).map_err(KnError::Io)
}

fn write_editor_template(path: &Path, title: &str, existing_content: &str) -> Result<()> {
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;

    writeln!(file, "<!-- Editing: {} -->", title)?;
    writeln!(
        file,
        "<!-- Lines that start with <!-- and end with --> are ignored. Save and exit when done. -->"
    )?;
    write!(file, "{}", existing_content)?;

    Ok(())
}

fn launch_editor(editor_cmd: &str, file_path: &Path) -> Result<()> {
    let args = split(editor_cmd).map_err(|e| KnError::EditorError {
        message: format!("Failed to parse editor command: {}", e),
    })?;

    let Some((program, rest)) = args.split_first() else {
        return Err(KnError::EditorError {
            message: "Empty editor command".to_string(),
        });
    };

    let status = Command::new(program).args(rest).arg(file_path).status()?;

    if !status.success() {
        return Err(KnError::EditorError {
            message: "Editor exited with non-zero status".to_string(),
        });
    }

    Ok(())
}

fn process_editor_content(content: &str) -> String {
    content
        .lines()
        .filter(|line| {
            !(line.trim_start().starts_with("<!--") && line.trim_end().ends_with("-->"))
        })
        .collect::<Vec<&str>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_comments_are_stripped() {
        let raw = "<!-- Editing: t -->\n<!-- help -->\nfirst\n\nsecond\n";
        assert_eq!(process_editor_content(raw), "first\n\nsecond");
    }

    #[test]
    fn millis_format_falls_back_for_out_of_range() {
        assert_eq!(format_millis(i64::MAX), "unknown");
    }
}
