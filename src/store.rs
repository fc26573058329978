//! In-memory authority for driver and order records.
//!
//! Both tables live behind a single reader/writer lock. Any write, to either
//! table, excludes every other reader and writer, so a cross-entity update is
//! never observable half-applied. Callers only ever receive clones.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::models::driver::{Driver, DriverStatus, DriverUpsert};
use crate::models::order::{NewOrder, Order, OrderStatus};
use crate::models::snapshot::StateSnapshot;

#[derive(Default)]
struct Tables {
    drivers: HashMap<String, Driver>,
    orders: HashMap<String, Order>,
}

#[derive(Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or wholesale replaces a driver. An absent or empty status
    /// defaults to `available`.
    pub fn upsert_driver(&self, input: DriverUpsert) -> Result<Driver, StoreError> {
        if input.id.is_empty() {
            return Err(StoreError::MissingField("id"));
        }
        if input.name.is_empty() {
            return Err(StoreError::MissingField("name"));
        }

        let status = match input.status.as_deref() {
            None | Some("") => DriverStatus::Available,
            Some(raw) => raw.parse()?,
        };

        let driver = Driver {
            id: input.id,
            name: input.name,
            status,
            location: input.location,
            updated_at: Utc::now(),
        };

        let mut tables = self.tables.write();
        tables.drivers.insert(driver.id.clone(), driver.clone());
        Ok(driver)
    }

    pub fn get_driver(&self, id: &str) -> Result<Driver, StoreError> {
        self.tables
            .read()
            .drivers
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::DriverNotFound(id.to_string()))
    }

    pub fn list_drivers(&self) -> Vec<Driver> {
        self.tables.read().drivers.values().cloned().collect()
    }

    pub fn list_available_drivers(&self) -> Vec<Driver> {
        self.tables
            .read()
            .drivers
            .values()
            .filter(|driver| driver.status == DriverStatus::Available)
            .cloned()
            .collect()
    }

    /// Overwrites a driver's status. Drivers have no transition graph, any
    /// status may follow any other.
    pub fn set_driver_status(&self, id: &str, status: &str) -> Result<Driver, StoreError> {
        let status: DriverStatus = status.parse()?;

        let mut tables = self.tables.write();
        let driver = tables
            .drivers
            .get_mut(id)
            .ok_or_else(|| StoreError::DriverNotFound(id.to_string()))?;

        driver.status = status;
        driver.updated_at = Utc::now();
        Ok(driver.clone())
    }

    /// Inserts a pending, unassigned order. A duplicate id overwrites the
    /// previous order.
    pub fn create_order(&self, input: NewOrder) -> Result<Order, StoreError> {
        if input.id.is_empty() {
            return Err(StoreError::MissingField("id"));
        }
        if input.customer.is_empty() {
            return Err(StoreError::MissingField("customer"));
        }

        let now = Utc::now();
        let order = Order {
            id: input.id,
            customer: input.customer,
            pickup: input.pickup,
            dropoff: input.dropoff,
            status: OrderStatus::Pending,
            driver_id: None,
            created_at: now,
            updated_at: now,
        };

        let mut tables = self.tables.write();
        tables.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    pub fn get_order(&self, id: &str) -> Result<Order, StoreError> {
        self.tables
            .read()
            .orders
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::OrderNotFound(id.to_string()))
    }

    pub fn list_orders(&self) -> Vec<Order> {
        self.tables.read().orders.values().cloned().collect()
    }

    pub fn list_pending_orders(&self) -> Vec<Order> {
        self.tables
            .read()
            .orders
            .values()
            .filter(|order| order.status == OrderStatus::Pending)
            .cloned()
            .collect()
    }

    pub fn set_order_status(&self, id: &str, status: &str) -> Result<Order, StoreError> {
        let next: OrderStatus = status.parse()?;

        let mut tables = self.tables.write();
        let order = tables
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::OrderNotFound(id.to_string()))?;

        if !order.status.can_transition_to(next) {
            return Err(StoreError::IllegalTransition {
                from: order.status,
                to: next,
            });
        }

        order.status = next;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    /// Moves an order to `assigned` and its driver to `busy` inside one
    /// exclusive critical section. Nothing is written unless every check
    /// passes.
    pub fn assign_order_to_driver(
        &self,
        order_id: &str,
        driver_id: &str,
    ) -> Result<(Order, Driver), StoreError> {
        let mut guard = self.tables.write();
        let tables = &mut *guard;

        let order = tables
            .orders
            .get_mut(order_id)
            .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))?;
        let driver = tables
            .drivers
            .get_mut(driver_id)
            .ok_or_else(|| StoreError::DriverNotFound(driver_id.to_string()))?;

        if order.status != OrderStatus::Pending {
            return Err(StoreError::OrderAlreadyAssigned(order_id.to_string()));
        }
        if driver.status != DriverStatus::Available {
            return Err(StoreError::DriverUnavailable(driver_id.to_string()));
        }

        let now = Utc::now();
        order.status = OrderStatus::Assigned;
        order.driver_id = Some(driver.id.clone());
        order.updated_at = now;

        driver.status = DriverStatus::Busy;
        driver.updated_at = now;

        Ok((order.clone(), driver.clone()))
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let tables = self.tables.read();

        StateSnapshot {
            drivers: tables.drivers.clone(),
            orders: tables.orders.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn counts(&self) -> (usize, usize) {
        let tables = self.tables.read();
        (tables.drivers.len(), tables.orders.len())
    }
}
