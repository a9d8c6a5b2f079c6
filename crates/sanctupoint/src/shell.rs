// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sanctupoint shell` command implementation.
//!
//! A line-oriented front end over the headless app: each command drives a
//! controller, then the result and the navigation state are rendered. Live
//! lists are opened on first view and released on sign-out.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use sanctupoint_app::appointments::{self, AppointmentBrowser, ManageAppointments};
use sanctupoint_app::auth::{LoginForm, RegistrationForm};
use sanctupoint_app::booking::{self, BookingForm};
use sanctupoint_app::donations::DonationSummary;
use sanctupoint_app::services::{ServiceBrowser, ServiceDashboard, ServiceForm};
use sanctupoint_app::staff::AddStaffForm;
use sanctupoint_app::{auth, customers, dashboard, payments, staff, App, AppContext, Notice};
use sanctupoint_config::model::SanctuConfig;
use sanctupoint_core::{AppointmentStatus, Role, SanctuError, Service};
use sanctupoint_nav::{ScreenKind, Tab};
use sanctupoint_realtime::LiveTable;

use crate::render;

/// How long a list view waits for its first fetch before rendering.
const FIRST_LOAD_WAIT: Duration = Duration::from_secs(5);

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Help,
    Quit,
    Login { username: String },
    Register,
    Logout,
    Profile,
    Where,
    Tab(Tab),
    Back,
    Search(String),
    Mode(String),
    Refresh,
    Service(i64),
    Book {
        service_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        notes: Option<String>,
    },
    SetStatus { appointment_id: i64, status: AppointmentStatus },
    AddService,
    EditService(i64),
    DeleteService(i64),
}

fn usage(text: &str) -> SanctuError {
    SanctuError::validation(format!("usage: {text}"))
}

fn parse_id(raw: Option<&str>, text: &str) -> Result<i64, SanctuError> {
    raw.and_then(|s| s.parse().ok()).ok_or_else(|| usage(text))
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, SanctuError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "/quit" | "/exit" => ShellCommand::Quit,
            "login" => match args.next() {
                Some(username) => ShellCommand::Login {
                    username: username.to_string(),
                },
                None => return Err(usage("login <username>")),
            },
            "register" => ShellCommand::Register,
            "logout" => ShellCommand::Logout,
            "profile" => ShellCommand::Profile,
            "where" => ShellCommand::Where,
            "back" => ShellCommand::Back,
            "tab" => {
                let name = args.next().ok_or_else(|| usage("tab <name>"))?;
                let tab = name
                    .parse::<Tab>()
                    .map_err(|_| SanctuError::validation(format!("unknown tab `{name}`")))?;
                ShellCommand::Tab(tab)
            }
            "appointments" => ShellCommand::Tab(Tab::Appointments),
            "services" => ShellCommand::Tab(Tab::Services),
            "history" => ShellCommand::Tab(Tab::History),
            "payments" => ShellCommand::Tab(Tab::Payments),
            "customers" => ShellCommand::Tab(Tab::Customers),
            "donations" => ShellCommand::Tab(Tab::Donations),
            "dashboard" => ShellCommand::Tab(Tab::Dashboard),
            "records" => ShellCommand::Tab(Tab::AppointmentRecords),
            "manage" => ShellCommand::Tab(Tab::ManageAppointments),
            "add-staff" => ShellCommand::Tab(Tab::AddStaff),
            "service-dashboard" => ShellCommand::Tab(Tab::ServiceDashboard),
            "search" => ShellCommand::Search(rest.to_string()),
            "mode" | "sort" | "filter" => ShellCommand::Mode(rest.to_string()),
            "refresh" => ShellCommand::Refresh,
            "service" => ShellCommand::Service(parse_id(args.next(), "service <id>")?),
            "book" => {
                const BOOK: &str = "book <service-id> <YYYY-MM-DD> <HH:MM> [notes]";
                let service_id = parse_id(args.next(), BOOK)?;
                let date = args
                    .next()
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                    .ok_or_else(|| usage(BOOK))?;
                let time = args.next().and_then(parse_time).ok_or_else(|| usage(BOOK))?;
                let notes = args.collect::<Vec<_>>().join(" ");
                ShellCommand::Book {
                    service_id,
                    date,
                    time,
                    notes: (!notes.is_empty()).then_some(notes),
                }
            }
            verb @ ("approve" | "complete" | "cancel") => {
                let status = match verb {
                    "approve" => AppointmentStatus::Approved,
                    "complete" => AppointmentStatus::Completed,
                    _ => AppointmentStatus::Cancelled,
                };
                ShellCommand::SetStatus {
                    appointment_id: parse_id(args.next(), &format!("{verb} <appointment-id>"))?,
                    status,
                }
            }
            "add-service" => ShellCommand::AddService,
            "edit-service" => ShellCommand::EditService(parse_id(args.next(), "edit-service <id>")?),
            "delete-service" => {
                ShellCommand::DeleteService(parse_id(args.next(), "delete-service <id>")?)
            }
            other => {
                return Err(SanctuError::validation(format!(
                    "unknown command `{other}`; type `help` for a list"
                )));
            }
        };
        Ok(command)
    }
}

/// Live lists held by the shell. Dropping one stops its refresh task.
#[derive(Default)]
struct Views {
    services: Option<ServiceBrowser>,
    appointments: Option<AppointmentBrowser>,
    manage: Option<ManageAppointments>,
    donations: Option<DonationSummary>,
    service_dashboard: Option<ServiceDashboard>,
}

impl Views {
    fn release(&mut self) {
        let held = [
            self.services.take().is_some(),
            self.appointments.take().is_some(),
            self.manage.take().is_some(),
            self.donations.take().is_some(),
            self.service_dashboard.take().is_some(),
        ];
        let released = held.iter().filter(|h| **h).count();
        if released > 0 {
            debug!(released, "released live lists");
        }
    }
}

struct Shell {
    app: App,
    rl: DefaultEditor,
    views: Views,
}

/// Runs the `sanctupoint shell` interactive REPL.
pub async fn run_shell(config: SanctuConfig) -> Result<(), SanctuError> {
    let ctx = Arc::new(AppContext::open(config).await?);
    let rl = DefaultEditor::new()
        .map_err(|e| SanctuError::Internal(format!("failed to initialize readline: {e}")))?;
    let mut shell = Shell {
        app: App::new(ctx.clone()),
        rl,
        views: Views::default(),
    };

    println!("{}", ctx.config.app.name.bold().green());
    println!(
        "Type {} for commands, {} to exit.\n",
        "help".yellow(),
        "quit".yellow()
    );
    render::location(shell.app.navigator());

    loop {
        let prompt = shell.prompt();
        match shell.rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = shell.rl.add_history_entry(trimmed);

                let command = match ShellCommand::parse(trimmed) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}: {e}", "error".red());
                        continue;
                    }
                };
                if command == ShellCommand::Quit {
                    break;
                }
                if let Err(e) = shell.dispatch(command).await {
                    render::error(&e);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    shell.views.release();
    ctx.shutdown().await?;
    info!("shell exited");
    Ok(())
}

impl Shell {
    fn prompt(&mut self) -> String {
        let nav = self.app.navigator();
        let label = match nav.active_tab() {
            Some(tab) => tab.to_string(),
            None => nav
                .current()
                .map(|r| r.screen.kind().to_string())
                .unwrap_or_default(),
        };
        format!("{}:{}> ", "sanctupoint".green(), label)
    }

    fn ctx(&self) -> Arc<AppContext> {
        self.app.context().clone()
    }

    /// Reads one line; `None` on Ctrl+C or Ctrl+D.
    fn ask(&mut self, label: &str, initial: &str) -> Option<String> {
        let prompt = format!("  {label}: ");
        match self.rl.readline_with_initial(&prompt, (initial, "")) {
            Ok(line) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }

    fn ask_password(label: &str) -> Result<SecretString, SanctuError> {
        rpassword::prompt_password(format!("  {label}: "))
            .map(SecretString::from)
            .map_err(|e| SanctuError::Internal(format!("failed to read password: {e}")))
    }

    async fn dispatch(&mut self, command: ShellCommand) -> Result<(), SanctuError> {
        match command {
            ShellCommand::Help => print_help(),
            ShellCommand::Quit => {}
            ShellCommand::Where => render::location(self.app.navigator()),
            ShellCommand::Login { username } => {
                let password = Self::ask_password("Password")?;
                let form = LoginForm {
                    username,
                    password,
                };
                let identity = self.app.login(&form).await?;
                render::notice(&Notice::success(format!(
                    "Welcome, {}!",
                    identity.display_name()
                )));
                render::location(self.app.navigator());
            }
            ShellCommand::Register => self.register().await?,
            ShellCommand::Logout => {
                self.views.release();
                render::notice(&self.app.logout());
                render::location(self.app.navigator());
            }
            ShellCommand::Profile => {
                let ctx = self.ctx();
                render::profile(&auth::profile(&ctx)?);
            }
            ShellCommand::Tab(tab) => {
                self.app.navigator().select_tab(tab)?;
                self.show_tab(tab).await?;
            }
            ShellCommand::Back => {
                self.app.navigator().pop()?;
                render::location(self.app.navigator());
            }
            ShellCommand::Search(query) => self.search(query).await?,
            ShellCommand::Mode(name) => self.mode(&name).await?,
            ShellCommand::Refresh => self.refresh().await?,
            ShellCommand::Service(id) => {
                let service = self.find_service(id).await?;
                render::service_details(&service);
                self.app.open_service(service)?;
            }
            ShellCommand::Book {
                service_id,
                date,
                time,
                notes,
            } => self.book(service_id, date, time, notes).await?,
            ShellCommand::SetStatus {
                appointment_id,
                status,
            } => {
                let ctx = self.ctx();
                let notice = appointments::set_status(&ctx, appointment_id, status).await?;
                render::notice(&notice);
            }
            ShellCommand::AddService => self.add_service().await?,
            ShellCommand::EditService(id) => self.edit_service(id).await?,
            ShellCommand::DeleteService(id) => self.delete_service(id).await?,
        }
        Ok(())
    }

    async fn register(&mut self) -> Result<(), SanctuError> {
        self.app.open_register()?;
        let Some(form) = self.registration_form()? else {
            self.app.navigator().pop()?;
            return Ok(());
        };
        match self.app.register(&form).await {
            Ok(_) => {
                render::notice(&Notice::success(
                    "Account created. You can now log in.",
                ));
                Ok(())
            }
            Err(e) => {
                self.app.navigator().pop()?;
                Err(e)
            }
        }
    }

    fn registration_form(&mut self) -> Result<Option<RegistrationForm>, SanctuError> {
        let Some(username) = self.ask("Username", "") else {
            return Ok(None);
        };
        let password = Self::ask_password("Password")?;
        let (Some(first_name), Some(last_name), Some(email), Some(phone)) = (
            self.ask("First name", ""),
            self.ask("Last name", ""),
            self.ask("Email", ""),
            self.ask("Phone (optional)", ""),
        ) else {
            return Ok(None);
        };
        Ok(Some(RegistrationForm {
            username,
            password,
            first_name,
            last_name,
            email,
            phone_number: (!phone.is_empty()).then_some(phone),
        }))
    }

    async fn show_tab(&mut self, tab: Tab) -> Result<(), SanctuError> {
        let ctx = self.ctx();
        render::heading(tab.title());
        match tab {
            Tab::Appointments => {
                let browser = self
                    .views
                    .appointments
                    .get_or_insert_with(|| AppointmentBrowser::open(&ctx));
                first_load(browser.live()).await;
                render::appointments(&browser.visible());
            }
            Tab::Services => {
                let browser = self
                    .views
                    .services
                    .get_or_insert_with(|| ServiceBrowser::open(&ctx));
                first_load(browser.live()).await;
                render::services(&browser.visible());
            }
            Tab::History => render::appointments(&appointments::history(&ctx).await?),
            Tab::Payments => render::payments(&payments::payment_history(&ctx).await?),
            Tab::Profile => render::profile(&auth::profile(&ctx)?),
            Tab::ManageAppointments => {
                if self.views.manage.is_none() {
                    self.views.manage = Some(ManageAppointments::open(&ctx)?);
                }
                if let Some(manage) = &self.views.manage {
                    first_load(manage.live()).await;
                    render::appointments(&manage.appointments());
                    println!(
                        "  {}",
                        "approve|complete|cancel <id> to change a status".dimmed()
                    );
                }
            }
            Tab::Donations => {
                if self.views.donations.is_none() {
                    self.views.donations = Some(DonationSummary::open(&ctx)?);
                }
                if let Some(summary) = &self.views.donations {
                    first_load(summary.live()).await;
                    render::donations(&summary.donations(), &summary.totals());
                }
            }
            Tab::Customers => render::people(&customers::customers(&ctx).await?),
            Tab::AppointmentRecords => {
                render::appointments(&appointments::records(&ctx).await?);
            }
            Tab::Dashboard => render::dashboard(&dashboard::load(&ctx).await?),
            Tab::AddStaff => self.add_staff().await?,
            Tab::ServiceDashboard => {
                if self.views.service_dashboard.is_none() {
                    self.views.service_dashboard = Some(ServiceDashboard::open(&ctx)?);
                }
                if let Some(board) = &self.views.service_dashboard {
                    first_load(board.live()).await;
                    render::service_stats(&board.stats());
                    render::services(&board.services());
                }
            }
        }
        Ok(())
    }

    fn searchable_tab(&mut self) -> Result<Tab, SanctuError> {
        match self.app.navigator().active_tab() {
            Some(tab @ (Tab::Appointments | Tab::Services)) => Ok(tab),
            _ => Err(SanctuError::Navigation(
                "search and filters are available on the Appointments and Services tabs"
                    .to_string(),
            )),
        }
    }

    async fn search(&mut self, query: String) -> Result<(), SanctuError> {
        let tab = self.searchable_tab()?;
        let ctx = self.ctx();
        match tab {
            Tab::Services => {
                let browser = self
                    .views
                    .services
                    .get_or_insert_with(|| ServiceBrowser::open(&ctx));
                browser.set_query(query);
                first_load(browser.live()).await;
                render::services(&browser.visible());
            }
            _ => {
                let browser = self
                    .views
                    .appointments
                    .get_or_insert_with(|| AppointmentBrowser::open(&ctx));
                browser.set_query(query);
                first_load(browser.live()).await;
                render::appointments(&browser.visible());
            }
        }
        Ok(())
    }

    async fn mode(&mut self, name: &str) -> Result<(), SanctuError> {
        let tab = self.searchable_tab()?;
        let ctx = self.ctx();
        match tab {
            Tab::Services => {
                let browser = self
                    .views
                    .services
                    .get_or_insert_with(|| ServiceBrowser::open(&ctx));
                browser.set_mode(name);
                println!("  {} {}", "sorted by".dimmed(), browser.filter.mode);
                first_load(browser.live()).await;
                render::services(&browser.visible());
            }
            _ => {
                let browser = self
                    .views
                    .appointments
                    .get_or_insert_with(|| AppointmentBrowser::open(&ctx));
                browser.set_mode(name);
                println!("  {} {}", "showing".dimmed(), browser.filter.mode);
                first_load(browser.live()).await;
                render::appointments(&browser.visible());
            }
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), SanctuError> {
        let tab = self.app.navigator().active_tab();
        let generation = match tab {
            Some(Tab::Services) => self.views.services.as_ref().map(|b| {
                let generation = b.live().snapshot().generation;
                b.refresh();
                generation
            }),
            Some(Tab::Appointments) => self.views.appointments.as_ref().map(|b| {
                let generation = b.live().snapshot().generation;
                b.refresh();
                generation
            }),
            Some(Tab::Donations) => self.views.donations.as_ref().map(|d| {
                let generation = d.live().snapshot().generation;
                d.refresh();
                generation
            }),
            _ => None,
        };
        let Some(tab) = tab else {
            return Err(SanctuError::Navigation("nothing to refresh here".to_string()));
        };
        if generation.is_none() {
            // Not opened yet: showing the tab performs the first load.
            return self.show_tab(tab).await;
        }
        match tab {
            Tab::Services => {
                if let (Some(b), Some(g)) = (&self.views.services, generation) {
                    next_generation(b.live(), g).await;
                }
            }
            Tab::Appointments => {
                if let (Some(b), Some(g)) = (&self.views.appointments, generation) {
                    next_generation(b.live(), g).await;
                }
            }
            Tab::Donations => {
                if let (Some(d), Some(g)) = (&self.views.donations, generation) {
                    next_generation(d.live(), g).await;
                }
            }
            _ => {}
        }
        self.show_tab(tab).await
    }

    async fn find_service(&mut self, id: i64) -> Result<Service, SanctuError> {
        let ctx = self.ctx();
        booking::bookable_services(&ctx)
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SanctuError::not_found("service", "Service not found."))
    }

    async fn book(
        &mut self,
        service_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        notes: Option<String>,
    ) -> Result<(), SanctuError> {
        let service = self.find_service(service_id).await?;
        let on_form = self.app.navigator().current().map(|r| r.screen.kind())
            == Some(ScreenKind::BookAppointment);
        if !on_form {
            self.app.start_booking(Some(service.clone()))?;
        }
        let mut form = BookingForm::new(Some(service), date, time);
        form.notes = notes;

        let appointment = self.app.book(&form).await?;
        render::notice(&Notice::success(format!(
            "Appointment #{} booked for {} at {}.",
            appointment.id,
            date,
            time.format("%H:%M")
        )));
        if let Some(browser) = &self.views.appointments {
            browser.refresh();
        }
        render::location(self.app.navigator());
        Ok(())
    }

    fn service_form(&mut self, initial: &ServiceForm) -> Option<ServiceForm> {
        Some(ServiceForm {
            name: self.ask("Name", &initial.name)?,
            description: self.ask("Description", &initial.description)?,
            price: self.ask("Price (blank for free)", &initial.price)?,
            duration: self.ask("Duration", &initial.duration)?,
        })
    }

    async fn add_service(&mut self) -> Result<(), SanctuError> {
        self.app.open_add_service()?;
        let Some(form) = self.service_form(&ServiceForm::default()) else {
            self.app.navigator().pop()?;
            return Ok(());
        };
        match self.app.save_new_service(&form).await {
            Ok(service) => {
                render::notice(&Notice::success(format!(
                    "Service \"{}\" added!",
                    service.name
                )));
                Ok(())
            }
            Err(e) => {
                self.app.navigator().pop()?;
                Err(e)
            }
        }
    }

    async fn edit_service(&mut self, id: i64) -> Result<(), SanctuError> {
        let service = self.find_service(id).await?;
        let initial = ServiceForm::from_service(&service);
        self.app.open_edit_service(service)?;
        let Some(form) = self.service_form(&initial) else {
            self.app.navigator().pop()?;
            return Ok(());
        };
        match self.app.save_service(id, &form).await {
            Ok(()) => {
                render::notice(&Notice::success("Service updated!"));
                Ok(())
            }
            Err(e) => {
                self.app.navigator().pop()?;
                Err(e)
            }
        }
    }

    async fn delete_service(&mut self, id: i64) -> Result<(), SanctuError> {
        let service = self.find_service(id).await?;
        let answer = self
            .ask(&format!("Delete \"{}\"? [y/N]", service.name), "")
            .unwrap_or_default();
        if !answer.eq_ignore_ascii_case("y") {
            println!("  {}", "cancelled".dimmed());
            return Ok(());
        }
        self.app.remove_service(id).await?;
        render::notice(&Notice::success("Service deleted!"));
        Ok(())
    }

    async fn add_staff(&mut self) -> Result<(), SanctuError> {
        let ctx = self.ctx();
        ctx.require_role(Role::is_admin, "add staff accounts")?;
        let (Some(full_name), Some(username), Some(email)) = (
            self.ask("Full name", ""),
            self.ask("Username", ""),
            self.ask("Email", ""),
        ) else {
            return Ok(());
        };
        let password = Self::ask_password("Password")?;
        let Some(role) = self.ask("Role (Secretary, Cashier, Priest)", "") else {
            return Ok(());
        };
        let form = AddStaffForm {
            full_name,
            username,
            email,
            password,
            role,
        };
        let identity = staff::add_staff(&ctx, &form).await?;
        render::notice(&Notice::success(format!(
            "{} added as {}.",
            identity.display_name(),
            identity.role.as_deref().unwrap_or("staff")
        )));
        Ok(())
    }
}

/// Waits briefly for a live list's first fetch.
async fn first_load<T: Clone + Send + Sync + 'static>(live: &LiveTable<T>) {
    match tokio::time::timeout(FIRST_LOAD_WAIT, live.loaded()).await {
        Ok(Ok(snapshot)) => {
            if let Some(err) = snapshot.last_error {
                warn!(table = %live.table(), error = %err, "showing cached rows");
                println!("  {}", format!("could not refresh: {err}").yellow());
            }
        }
        Ok(Err(e)) => warn!(table = %live.table(), error = %e, "live list unavailable"),
        Err(_) => println!("  {}", "still loading...".dimmed()),
    }
}

async fn next_generation<T: Clone + Send + Sync + 'static>(live: &LiveTable<T>, after: u64) {
    if tokio::time::timeout(FIRST_LOAD_WAIT, live.wait_for(|s| s.generation > after))
        .await
        .is_err()
    {
        println!("  {}", "refresh still running...".dimmed());
    }
}

fn print_help() {
    let rows: &[(&str, &str)] = &[
        ("login <username>", "sign in"),
        ("register", "create a customer account"),
        ("logout", "sign out"),
        ("where", "show the current screen and tabs"),
        ("tab <name>", "switch tab (appointments, services, history, payments, ...)"),
        ("back", "leave the current screen"),
        ("search <text>", "search the current list"),
        ("mode <name>", "filter or sort the current list (Upcoming, A-Z, ...)"),
        ("refresh", "reload the current list"),
        ("service <id>", "show a service"),
        ("book <id> <date> <time> [notes]", "book a service"),
        ("approve|complete|cancel <id>", "change an appointment status"),
        ("add-service, edit-service <id>, delete-service <id>", "manage services"),
        ("profile", "show your account"),
        ("quit", "exit"),
    ];
    for (command, description) in rows {
        println!("  {:<52} {}", command.yellow(), description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tab_aliases() {
        assert_eq!(
            ShellCommand::parse("services").unwrap(),
            ShellCommand::Tab(Tab::Services)
        );
        assert_eq!(
            ShellCommand::parse("tab manage-appointments").unwrap(),
            ShellCommand::Tab(Tab::ManageAppointments)
        );
        assert!(ShellCommand::parse("tab nowhere").is_err());
    }

    #[test]
    fn parses_booking() {
        let command = ShellCommand::parse("book 3 2026-11-02 09:30 family of four").unwrap();
        assert_eq!(
            command,
            ShellCommand::Book {
                service_id: 3,
                date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
                time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
                notes: Some("family of four".to_string()),
            }
        );
    }

    #[test]
    fn booking_requires_date_and_time() {
        assert!(ShellCommand::parse("book 3").is_err());
        assert!(ShellCommand::parse("book 3 next-week 09:30").is_err());
        assert!(ShellCommand::parse("book 3 2026-11-02 noon").is_err());
    }

    #[test]
    fn parses_status_changes() {
        assert_eq!(
            ShellCommand::parse("approve 12").unwrap(),
            ShellCommand::SetStatus {
                appointment_id: 12,
                status: AppointmentStatus::Approved
            }
        );
        assert_eq!(
            ShellCommand::parse("Cancel 4").unwrap(),
            ShellCommand::SetStatus {
                appointment_id: 4,
                status: AppointmentStatus::Cancelled
            }
        );
        assert!(ShellCommand::parse("complete abc").is_err());
    }

    #[test]
    fn search_keeps_the_whole_query() {
        assert_eq!(
            ShellCommand::parse("search  first communion ").unwrap(),
            ShellCommand::Search("first communion".to_string())
        );
        assert_eq!(
            ShellCommand::parse("search").unwrap(),
            ShellCommand::Search(String::new())
        );
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = ShellCommand::parse("pray").unwrap_err();
        assert!(err.to_string().contains("unknown command"));
    }
}
