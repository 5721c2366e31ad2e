//! Shared data structures for the kinetic-notes application.
//!
//! This module contains the transient filter state that drives the visible
//! list, the crate `Result` alias and the CLI subcommands.
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::{KnError, NoteColor, Theme};

/// A specialized Result type for kinetic-notes operations.
pub type Result<T> = std::result::Result<T, KnError>;

/// Whether the visible list is restricted to favourite notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FavoritesFilter {
    #[default]
    All,
    Favorites,
}

/// Restricts the visible list to notes carrying one exact tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl From<Option<String>> for TagFilter {
    fn from(tag: Option<String>) -> Self {
        match tag {
            Some(tag) => TagFilter::Tag(tag),
            None => TagFilter::All,
        }
    }
}

/// Timestamp the visible list is ordered by, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    UpdatedAt,
    CreatedAt,
}

/// Transient UI filter inputs. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_query: String,
    pub favorites: FavoritesFilter,
    pub tag: TagFilter,
    pub sort_by: SortBy,
}

impl FilterState {
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn favorites_only(mut self) -> Self {
        self.favorites = FavoritesFilter::Favorites;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = TagFilter::Tag(tag.into());
        self
    }

    pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands for the kinotes application
#[derive(Subcommand)]
pub enum Commands {
    /// Log in with the local credentials
    Login {
        #[clap(short, long)]
        username: String,

        #[clap(short, long)]
        password: String,
    },

    /// Log out of the current session
    Logout,

    /// Create a new note
    Create {
        /// Title of the note
        #[clap(short = 'T', long)]
        title: String,

        /// Content of the note
        #[clap(short, long)]
        content: Option<String>,

        /// Path to a file containing the note's content
        #[clap(short, long)]
        file: Option<PathBuf>,

        /// Tags to associate with the note (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,

        /// Palette colour of the note
        #[clap(long, default_value = "default")]
        color: NoteColor,

        /// Image attached to the note (data URI or URL)
        #[clap(short, long)]
        image: Option<String>,

        /// Local image file to attach, stored inline as a data URI
        #[clap(long, conflicts_with = "image")]
        image_file: Option<PathBuf>,

        /// Mark the note as a favourite
        #[clap(long)]
        favorite: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: String,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Path to a file containing the new note content
        #[clap(short, long)]
        file: Option<PathBuf>,

        /// Open the current content in the editor
        #[clap(short, long)]
        edit: bool,

        /// Tags to add (comma-separated)
        #[clap(long)]
        add_tags: Option<String>,

        /// Tags to remove (comma-separated)
        #[clap(long)]
        remove_tags: Option<String>,

        /// New palette colour
        #[clap(long)]
        color: Option<NoteColor>,

        /// New image (data URI or URL)
        #[clap(short, long)]
        image: Option<String>,

        /// New image from a local file, stored inline as a data URI
        #[clap(long, conflicts_with = "image")]
        image_file: Option<PathBuf>,

        /// Remove the attached image
        #[clap(long, conflicts_with_all = ["image", "image_file"])]
        clear_image: bool,
    },

    /// Delete a note by ID; it can be restored with `undo` for a short while
    Delete {
        /// ID of the note to delete
        id: String,
    },

    /// Restore the most recently deleted note
    Undo,

    /// Toggle the favourite flag of a note
    Favorite {
        /// ID of the note
        id: String,
    },

    /// List notes with optional filtering
    List {
        /// Case-insensitive search over title, content and tags
        #[clap(short, long)]
        search: Option<String>,

        /// Only show favourite notes
        #[clap(short = 'F', long)]
        favorites: bool,

        /// Only show notes with this exact tag
        #[clap(short, long)]
        tag: Option<String>,

        /// Timestamp to sort by, newest first
        #[clap(long, value_enum, default_value_t = SortBy::UpdatedAt)]
        sort_by: SortBy,

        /// Limit the number of notes shown (0 shows all)
        #[clap(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Output format
        #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Print full content instead of a preview
        #[clap(short, long)]
        detailed: bool,
    },

    /// List every distinct tag
    Tags,

    /// Move the given notes to the front of the collection, in this order
    Reorder {
        /// IDs of the notes in their new order
        #[clap(required = true)]
        ids: Vec<String>,
    },

    /// Show or change the colour theme
    Theme {
        /// New theme; omit to show the current one
        #[clap(value_enum)]
        theme: Option<Theme>,
    },
}
