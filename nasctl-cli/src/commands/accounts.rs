//! User and group commands

use super::{require_item, submit, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use nasctl_common::accounts::{CreateGroupRequest, CreateUserRequest, Group, User, UserRole};
use nasctl_console::resources::{Groups, Users};
use nasctl_console::{FormDialog, ListPanel};
use std::sync::Arc;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List,
    /// Show one user
    Show { id: u64 },
    /// Create a user
    Create {
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, default_value = "")]
        full_name: String,
        /// admin, user or guest
        #[arg(short, long, default_value = "user")]
        role: UserRole,
        /// Prompted when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Update a user
    Update {
        id: u64,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        full_name: Option<String>,
        #[arg(short, long)]
        role: Option<UserRole>,
        /// Prompt for a new password
        #[arg(long)]
        reset_password: bool,
    },
    /// Delete a user
    Delete { id: u64 },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// List groups
    List,
    /// Show a group and its members
    Show { id: u64 },
    /// Create a group
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Update a group
    Update {
        id: u64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a group
    Delete { id: u64 },
    /// Add a user to a group
    AddMember { id: u64, user_id: u64 },
    /// Remove a user from a group
    RemoveMember { id: u64, user_id: u64 },
}

#[derive(Tabled)]
struct UserRow {
    id: u64,
    username: String,
    full_name: String,
    email: String,
    role: String,
    active: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: output::or_dash(&user.full_name),
            email: output::or_dash(&user.email),
            role: user.role.to_string(),
            active: output::yes_no(user.is_active).to_string(),
        }
    }
}

#[derive(Tabled)]
struct GroupRow {
    id: u64,
    name: String,
    description: String,
    members: usize,
    system: String,
}

impl From<&Group> for GroupRow {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
            description: output::truncate(&output::or_dash(&group.description), 40),
            members: group.members.len(),
            system: output::yes_no(group.is_system).to_string(),
        }
    }
}

fn prompt_password(prompt: &str) -> Result<String> {
    let password = rpassword::prompt_password(format!("{}: ", prompt))?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }
    Ok(password)
}

pub async fn handle_user_command(command: UserCommands, ctx: &Context) -> Result<()> {
    let service = || Users::new(ctx.api.users.clone());

    match command {
        UserCommands::List => {
            let panel = ctx.mount(service()).await?;
            output::print_records::<_, UserRow>(panel.items(), ctx.format)?;
        }

        UserCommands::Show { id } => {
            let user = ctx.api.users.get(id).await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("User:");
                    println!("  ID: {}", user.id);
                    println!("  Username: {}", user.username);
                    println!("  Full name: {}", output::or_dash(&user.full_name));
                    println!("  Email: {}", output::or_dash(&user.email));
                    println!("  Role: {}", user.role);
                    println!("  Active: {}", output::yes_no(user.is_active));
                    println!("  Created: {}", user.created_at.as_deref().unwrap_or("-"));
                }
                format => output::print_single(&user, format)?,
            }
        }

        UserCommands::Create {
            username,
            email,
            full_name,
            role,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password("Password")?,
            };

            let service = Arc::new(service());
            let mut panel = ListPanel::new(service.clone());
            let mut dialog = FormDialog::new(service);
            dialog.open_create();
            *dialog.draft_mut() = CreateUserRequest {
                username: username.clone(),
                email,
                password,
                full_name,
                role,
            };

            submit(&mut dialog, &mut panel).await?;
            output::print_created("User", &username);
        }

        UserCommands::Update {
            id,
            email,
            full_name,
            role,
            reset_password,
        } => {
            let mut panel = ctx.mount(service()).await?;
            let existing = require_item(&panel, &id)?.clone();

            let mut dialog = FormDialog::new(panel.service().clone());
            dialog.open_edit(&existing);
            {
                let draft = dialog.draft_mut();
                if let Some(email) = email {
                    draft.email = email;
                }
                if let Some(full_name) = full_name {
                    draft.full_name = full_name;
                }
                if let Some(role) = role {
                    draft.role = role;
                }
                if reset_password {
                    draft.password = prompt_password("New password")?;
                }
            }

            submit(&mut dialog, &mut panel).await?;
            output::print_updated("User", &existing.username);
        }

        UserCommands::Delete { id } => {
            if !ctx.confirm(&format!("Delete user {}?", id))? {
                output::print_info("Deletion aborted");
                return Ok(());
            }
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.delete(id).await?;
            output::print_deleted("User", &id.to_string());
        }
    }

    Ok(())
}

pub async fn handle_group_command(command: GroupCommands, ctx: &Context) -> Result<()> {
    let service = || Groups::new(ctx.api.groups.clone());

    match command {
        GroupCommands::List => {
            let panel = ctx.mount(service()).await?;
            output::print_records::<_, GroupRow>(panel.items(), ctx.format)?;
        }

        GroupCommands::Show { id } => {
            let group = ctx.api.groups.get(id).await?;
            let members = ctx.api.groups.members(id).await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("Group:");
                    println!("  ID: {}", group.id);
                    println!("  Name: {}", group.name);
                    println!("  Description: {}", output::or_dash(&group.description));
                    println!("  System: {}", output::yes_no(group.is_system));
                    output::print_records::<_, UserRow>(&members, OutputFormat::Table)?;
                }
                format => output::print_single(&members, format)?,
            }
        }

        GroupCommands::Create { name, description } => {
            let service = Arc::new(service());
            let mut panel = ListPanel::new(service.clone());
            let mut dialog = FormDialog::new(service);
            dialog.open_create();
            *dialog.draft_mut() = CreateGroupRequest {
                name: name.clone(),
                description,
            };

            submit(&mut dialog, &mut panel).await?;
            output::print_created("Group", &name);
        }

        GroupCommands::Update {
            id,
            name,
            description,
        } => {
            let mut panel = ctx.mount(service()).await?;
            let existing = require_item(&panel, &id)?.clone();

            let mut dialog = FormDialog::new(panel.service().clone());
            dialog.open_edit(&existing);
            if let Some(name) = name {
                dialog.draft_mut().name = name;
            }
            if let Some(description) = description {
                dialog.draft_mut().description = description;
            }

            submit(&mut dialog, &mut panel).await?;
            output::print_updated("Group", &updated_name(&existing, &panel));
        }

        GroupCommands::Delete { id } => {
            if !ctx.confirm(&format!("Delete group {}?", id))? {
                output::print_info("Deletion aborted");
                return Ok(());
            }
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.delete(id).await?;
            output::print_deleted("Group", &id.to_string());
        }

        GroupCommands::AddMember { id, user_id } => {
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.add_member(id, user_id).await?;
            output::print_success(&format!("User {} added to group {}", user_id, id));
        }

        GroupCommands::RemoveMember { id, user_id } => {
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.remove_member(id, user_id).await?;
            output::print_success(&format!("User {} removed from group {}", user_id, id));
        }
    }

    Ok(())
}

/// Current name of a group after an update
fn updated_name(existing: &Group, panel: &ListPanel<Groups>) -> String {
    panel
        .find(&existing.id)
        .map(|g| g.name.clone())
        .unwrap_or_else(|| existing.name.clone())
}
