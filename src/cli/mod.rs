//! Command-line interface for hearth
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::error::Result;
use crate::events::{Event, EventDestination, EventKind, EventSink};
use crate::feedback::{FeedbackKind, FeedbackPriority};
use crate::hub::Hub;
use crate::identity::UserIdentity;
use crate::output::OutputOptions;

mod category;
mod clarity;
mod creative;
mod feedback;
mod init;
mod profile;
mod session;
mod task;

/// hearth - household coordination hub
///
/// A CLI for the shared life of one household: tasks with visibility and
/// assignment rules, blame-free clarity messages, member profiles and
/// skills, and a shared category set.
#[derive(Parser, Debug)]
#[command(name = "hearth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the hub root (defaults to walking up from the current directory)
    #[arg(long, global = true, env = "HEARTH_HUB")]
    pub hub: Option<PathBuf>,

    /// Act as this member instead of the signed-in session
    #[arg(long, global = true, env = "HEARTH_USER")]
    pub user: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit JSONL events to a file, or "-" for stdout
    #[arg(long, global = true, env = "HEARTH_EVENTS")]
    pub events: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a hub in a directory
    Init {
        /// Household display name
        #[arg(long)]
        household: Option<String>,

        /// Directory to initialize (defaults to current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Sign in as a household member
    Signin {
        /// Display name
        name: String,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Avatar URL
        #[arg(long)]
        photo_url: Option<String>,
    },

    /// Sign out of the current session
    Signout,

    /// Show the current viewer
    Whoami,

    /// Task board management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Clarity hub messages and agreements
    #[command(subcommand)]
    Clarity(ClarityCommands),

    /// Shared category set
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Member profiles
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Skills on the viewer's profile
    #[command(subcommand)]
    Skill(SkillCommands),

    /// Feature requests and feedback
    #[command(subcommand)]
    Feedback(FeedbackCommands),

    /// Creative corner posts
    #[command(subcommand)]
    Share(ShareCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task owned by the viewer
    Add {
        /// Task text
        text: String,

        /// Category label (defaults to the configured default)
        #[arg(long)]
        category: Option<String>,

        /// Only visible to the owner
        #[arg(long)]
        private: bool,
    },

    /// Show the viewer's board: own tasks plus shared tasks, newest first
    List,

    /// Mark a task completed
    Done {
        /// Task ID
        id: String,
    },

    /// Mark a completed task as open again
    Reopen {
        /// Task ID
        id: String,
    },

    /// Edit a task's text, category, or visibility
    Edit {
        /// Task ID
        id: String,

        /// New task text
        #[arg(long)]
        text: Option<String>,

        /// New category label
        #[arg(long)]
        category: Option<String>,

        /// Make the task private
        #[arg(long, conflicts_with = "shared")]
        private: bool,

        /// Make the task visible to the household
        #[arg(long)]
        shared: bool,
    },

    /// Remove a task
    Rm {
        /// Task ID
        id: String,
    },

    /// Remove all of the viewer's completed tasks
    Clear,

    /// Claim an unassigned task
    Claim {
        /// Task ID
        id: String,
    },

    /// Clear the viewer's assignment on a task
    Unassign {
        /// Task ID
        id: String,
    },
}

/// Clarity subcommands
#[derive(Subcommand, Debug)]
pub enum ClarityCommands {
    /// Post a blame-free message
    Post {
        /// Short title
        #[arg(long)]
        title: String,

        /// What was observed, without blame
        #[arg(long)]
        observation: String,

        /// The open question for the household
        #[arg(long)]
        question: String,

        /// An optional suggested resolution
        #[arg(long)]
        suggest: Option<String>,
    },

    /// List active messages, newest first
    List {
        /// Show resolved agreements instead
        #[arg(long)]
        resolved: bool,
    },

    /// Resolve a message into an immutable agreement
    Resolve {
        /// Message ID
        id: String,

        /// The agreed resolution
        #[arg(long)]
        resolution: String,
    },
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List the household's categories
    List,

    /// Add a category
    Add {
        /// Category label
        name: String,
    },

    /// Remove a category (tasks keep the orphaned label)
    Rm {
        /// Category label
        name: String,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show a profile (defaults to the viewer's)
    Show {
        /// Member uid
        uid: Option<String>,
    },

    /// Update the viewer's own profile fields
    Set {
        /// Availability status, e.g. "home", "away"
        #[arg(long)]
        status: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Current vibe
        #[arg(long)]
        vibe: Option<String>,
    },
}

/// Skill subcommands
#[derive(Subcommand, Debug)]
pub enum SkillCommands {
    /// List the viewer's skills
    List,

    /// Add a skill to the viewer's profile
    Add {
        /// Skill name
        name: String,

        /// Skill level, e.g. "beginner", "expert"
        level: String,
    },

    /// Change the level of an existing skill
    Set {
        /// Skill name
        name: String,

        /// New level
        level: String,
    },

    /// Remove a skill
    Rm {
        /// Skill name
        name: String,
    },
}

/// Feedback subcommands
#[derive(Subcommand, Debug)]
pub enum FeedbackCommands {
    /// Log a feature request or piece of feedback
    Add {
        /// Kind of feedback
        #[arg(long, value_enum, default_value = "improvement")]
        kind: FeedbackKind,

        /// Short title
        #[arg(long)]
        title: String,

        /// Full description
        #[arg(long)]
        description: String,

        /// Priority
        #[arg(long, value_enum, default_value = "medium")]
        priority: FeedbackPriority,
    },

    /// List logged feedback, newest first
    List,
}

/// Creative corner subcommands
#[derive(Subcommand, Debug)]
pub enum ShareCommands {
    /// Share a post with the household
    Post {
        /// Post title
        #[arg(long)]
        title: String,

        /// Post content
        #[arg(long)]
        content: String,

        /// Kind of post: recipe, poem, photo, link, ...
        #[arg(long, default_value = "note")]
        kind: String,
    },

    /// List shared posts, newest first
    List,

    /// Remove one of your own posts
    Rm {
        /// Post ID
        id: String,
    },
}

/// Global flags shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub hub: Option<PathBuf>,
    pub user: Option<String>,
    pub json: bool,
    pub quiet: bool,
    pub events: Option<String>,
}

/// Resolved per-invocation context: the hub, output options, and an
/// optional event sink.
pub(crate) struct CommandContext {
    pub hub: Hub,
    pub output: OutputOptions,
    user: Option<String>,
    sink: Option<EventSink>,
}

impl CommandContext {
    pub fn open(globals: &GlobalOptions) -> Result<Self> {
        let hub = Hub::discover(globals.hub.as_deref())?;
        let sink = match EventDestination::parse(globals.events.as_deref()) {
            Some(destination) => Some(destination.open()?),
            None => None,
        };
        Ok(Self {
            hub,
            output: OutputOptions {
                json: globals.json,
                quiet: globals.quiet,
            },
            user: globals.user.clone(),
            sink,
        })
    }

    /// Resolve the acting viewer: flag, environment, session, then the
    /// configured default user.
    pub fn require_viewer(&self) -> Result<UserIdentity> {
        let data_dir = self.hub.data_dir();
        if let Some(viewer) =
            crate::identity::resolve_viewer(&data_dir, self.user.as_deref())?
        {
            return Ok(viewer);
        }
        if let Some(name) = self.hub.config.identity.default_user.as_deref() {
            return UserIdentity::from_name(name, None, None);
        }
        Err(crate::error::Error::NotSignedIn)
    }

    pub fn emit_event<T: Serialize>(
        &mut self,
        kind: EventKind,
        actor: Option<String>,
        data: T,
    ) -> Result<()> {
        if let Some(sink) = &mut self.sink {
            let event = Event::new(kind, actor).with_data(data)?;
            sink.emit(&event)?;
        }
        Ok(())
    }
}

impl Cli {
    fn globals(&self) -> GlobalOptions {
        GlobalOptions {
            hub: self.hub.clone(),
            user: self.user.clone(),
            json: self.json,
            quiet: self.quiet,
            events: self.events.clone(),
        }
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let globals = self.globals();
        match self.command {
            Commands::Init { household, dir } => init::run(init::InitOptions {
                household,
                dir,
                globals,
            }),
            Commands::Signin {
                name,
                email,
                photo_url,
            } => session::run_signin(session::SigninOptions {
                name,
                email,
                photo_url,
                globals,
            }),
            Commands::Signout => session::run_signout(&globals),
            Commands::Whoami => session::run_whoami(&globals),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    text,
                    category,
                    private,
                } => task::run_add(task::AddOptions {
                    text,
                    category,
                    private,
                    globals,
                }),
                TaskCommands::List => task::run_list(&globals),
                TaskCommands::Done { id } => task::run_set_completed(&globals, &id, true),
                TaskCommands::Reopen { id } => task::run_set_completed(&globals, &id, false),
                TaskCommands::Edit {
                    id,
                    text,
                    category,
                    private,
                    shared,
                } => task::run_edit(task::EditOptions {
                    id,
                    text,
                    category,
                    private,
                    shared,
                    globals,
                }),
                TaskCommands::Rm { id } => task::run_rm(&globals, &id),
                TaskCommands::Clear => task::run_clear(&globals),
                TaskCommands::Claim { id } => task::run_claim(&globals, &id),
                TaskCommands::Unassign { id } => task::run_unassign(&globals, &id),
            },
            Commands::Clarity(cmd) => match cmd {
                ClarityCommands::Post {
                    title,
                    observation,
                    question,
                    suggest,
                } => clarity::run_post(clarity::PostOptions {
                    title,
                    observation,
                    question,
                    suggest,
                    globals,
                }),
                ClarityCommands::List { resolved } => clarity::run_list(&globals, resolved),
                ClarityCommands::Resolve { id, resolution } => {
                    clarity::run_resolve(&globals, &id, &resolution)
                }
            },
            Commands::Category(cmd) => match cmd {
                CategoryCommands::List => category::run_list(&globals),
                CategoryCommands::Add { name } => category::run_add(&globals, &name),
                CategoryCommands::Rm { name } => category::run_rm(&globals, &name),
            },
            Commands::Profile(cmd) => match cmd {
                ProfileCommands::Show { uid } => profile::run_show(&globals, uid.as_deref()),
                ProfileCommands::Set {
                    status,
                    notes,
                    vibe,
                } => profile::run_set(profile::SetOptions {
                    status,
                    notes,
                    vibe,
                    globals,
                }),
            },
            Commands::Skill(cmd) => match cmd {
                SkillCommands::List => profile::run_skill_list(&globals),
                SkillCommands::Add { name, level } => {
                    profile::run_skill_add(&globals, &name, &level)
                }
                SkillCommands::Set { name, level } => {
                    profile::run_skill_set(&globals, &name, &level)
                }
                SkillCommands::Rm { name } => profile::run_skill_rm(&globals, &name),
            },
            Commands::Feedback(cmd) => match cmd {
                FeedbackCommands::Add {
                    kind,
                    title,
                    description,
                    priority,
                } => feedback::run_add(feedback::AddOptions {
                    kind,
                    title,
                    description,
                    priority,
                    globals,
                }),
                FeedbackCommands::List => feedback::run_list(&globals),
            },
            Commands::Share(cmd) => match cmd {
                ShareCommands::Post {
                    title,
                    content,
                    kind,
                } => creative::run_post(creative::PostOptions {
                    title,
                    content,
                    kind,
                    globals,
                }),
                ShareCommands::List => creative::run_list(&globals),
                ShareCommands::Rm { id } => creative::run_rm(&globals, &id),
            },
        }
    }
}
