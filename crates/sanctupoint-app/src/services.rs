// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service browser, add/edit forms and the service dashboard.

use serde_json::{json, Value};
use tracing::info;

use sanctupoint_core::query::{decode_row, row, Direction, Filter, Row, SelectQuery, Table};
use sanctupoint_core::{Role, SanctuError, Service};
use sanctupoint_filter::{FilterState, ServiceSort};
use sanctupoint_realtime::LiveTable;

use crate::context::AppContext;

/// Every service, by name.
pub fn by_name() -> SelectQuery {
    SelectQuery::new(Table::Services).order_by("service_name", Direction::Asc)
}

/// Live service list with search and sort applied.
pub struct ServiceBrowser {
    live: LiveTable<Service>,
    pub filter: FilterState<ServiceSort>,
}

impl ServiceBrowser {
    pub fn open(ctx: &AppContext) -> Self {
        Self {
            live: LiveTable::query(ctx.store.clone(), by_name(), ctx.live_options()),
            filter: FilterState::default(),
        }
    }

    pub fn live(&self) -> &LiveTable<Service> {
        &self.live
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    /// Selects a sort by its picker label; unknown labels keep source order.
    pub fn set_mode(&mut self, name: &str) {
        self.filter.mode = ServiceSort::parse_lenient(name);
    }

    pub fn visible(&self) -> Vec<Service> {
        self.filter.apply(&self.live.rows())
    }

    pub fn refresh(&self) {
        self.live.refresh();
    }
}

/// Add/edit service form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    /// Free text; blank means no price.
    pub price: String,
    pub duration: String,
}

impl ServiceForm {
    /// Form prefilled from an existing service, for editing.
    pub fn from_service(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            description: service.description.clone().unwrap_or_default(),
            price: service.price.map(|p| p.to_string()).unwrap_or_default(),
            duration: service.duration.clone().unwrap_or_default(),
        }
    }

    /// Validated column values.
    pub fn to_row(&self) -> Result<Row, SanctuError> {
        let name = self.name.trim();
        let description = self.description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(SanctuError::validation(
                "Please enter a name and description.",
            ));
        }

        let price = match self.price.trim() {
            "" => Value::Null,
            raw => match raw.parse::<f64>() {
                Ok(p) if p.is_finite() && p >= 0.0 => json!(p),
                _ => {
                    return Err(SanctuError::validation(
                        "Price must be a non-negative number.",
                    ));
                }
            },
        };
        let duration = match self.duration.trim() {
            "" => Value::Null,
            d => json!(d),
        };

        Ok(row([
            ("service_name", json!(name)),
            ("description", json!(description)),
            ("price", price),
            ("duration", duration),
        ]))
    }
}

fn require_manager(ctx: &AppContext) -> Result<(), SanctuError> {
    ctx.require_role(Role::can_manage_services, "manage services")
        .map(|_| ())
}

pub async fn add_service(ctx: &AppContext, form: &ServiceForm) -> Result<Service, SanctuError> {
    require_manager(ctx)?;
    let record = form.to_row()?;
    let stored = ctx
        .store
        .insert(Table::Services, vec![record])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| SanctuError::Internal("insert returned no row".to_string()))?;
    let service: Service = decode_row(stored)?;
    info!(service_id = service.id, name = %service.name, "service added");
    Ok(service)
}

pub async fn update_service(
    ctx: &AppContext,
    service_id: i64,
    form: &ServiceForm,
) -> Result<(), SanctuError> {
    require_manager(ctx)?;
    let patch = form.to_row()?;
    let changed = ctx
        .store
        .update(Table::Services, patch, vec![Filter::eq("service_id", service_id)])
        .await?;
    if changed == 0 {
        return Err(SanctuError::not_found("service", "Service not found."));
    }
    info!(service_id, "service updated");
    Ok(())
}

pub async fn delete_service(ctx: &AppContext, service_id: i64) -> Result<(), SanctuError> {
    require_manager(ctx)?;
    let removed = ctx
        .store
        .delete(Table::Services, vec![Filter::eq("service_id", service_id)])
        .await?;
    if removed == 0 {
        return Err(SanctuError::not_found("service", "Service not found."));
    }
    info!(service_id, "service deleted");
    Ok(())
}

/// Headline figures on the service dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceStats {
    pub total: usize,
    /// Mean price with absent prices counted as zero; zero when empty.
    pub average_price: f64,
}

impl ServiceStats {
    pub fn from_services(services: &[Service]) -> Self {
        let total = services.len();
        let sum: f64 = services.iter().map(Service::effective_price).sum();
        let average_price = if total == 0 { 0.0 } else { sum / total as f64 };
        Self {
            total,
            average_price,
        }
    }
}

/// Admin-only live dashboard over the services table.
pub struct ServiceDashboard {
    live: LiveTable<Service>,
}

impl ServiceDashboard {
    pub fn open(ctx: &AppContext) -> Result<Self, SanctuError> {
        ctx.require_role(Role::is_admin, "open the service dashboard")?;
        Ok(Self {
            live: LiveTable::query(ctx.store.clone(), by_name(), ctx.live_options()),
        })
    }

    pub fn live(&self) -> &LiveTable<Service> {
        &self.live
    }

    pub fn services(&self) -> Vec<Service> {
        self.live.rows()
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats::from_services(&self.live.rows())
    }
}
