// ============================================================================
// Test Support - fixtures and in-memory collaborators
// ============================================================================
//
// The fakes record every call so cascade tests can assert on exactly what
// was deducted, awarded and notified.
//
// ============================================================================

pub mod fixtures;

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::order::{Order, OrderDetails, OrderLine, OrderStatus};
use crate::domain::{CustomerSummary, DeliveryZone, NewNotification, Product, User, UserRole};
use crate::error::AppError;
use crate::messaging::{BroadcastMessage, RealtimeBroadcaster};
use crate::services::{InventoryService, LoyaltyService, NotificationService, UserDirectory};
use crate::store::{NewOrder, OrderRepository};

// ============================================================================
// Inventory
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Deduction {
    pub product_id: i64,
    pub quantity: i32,
    pub reason: String,
}

#[derive(Default)]
pub struct RecordingInventory {
    pub deductions: Mutex<Vec<Deduction>>,
    fail_for_product: Option<i64>,
}

impl RecordingInventory {
    pub fn failing_for(product_id: i64) -> Self {
        Self {
            deductions: Mutex::new(Vec::new()),
            fail_for_product: Some(product_id),
        }
    }

    pub fn deductions(&self) -> Vec<Deduction> {
        self.deductions.lock().unwrap().clone()
    }
}

#[async_trait]
impl InventoryService for RecordingInventory {
    async fn deduct_stock(&self, product_id: i64, quantity: i32, reason: &str) -> Result<i32, AppError> {
        if self.fail_for_product == Some(product_id) {
            return Err(AppError::not_found("Product", product_id));
        }

        self.deductions.lock().unwrap().push(Deduction {
            product_id,
            quantity,
            reason: reason.to_string(),
        });
        Ok(100 - quantity)
    }
}

// ============================================================================
// Loyalty
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Award {
    pub customer_id: i64,
    pub points: i64,
    pub reason: String,
}

#[derive(Default)]
pub struct RecordingLoyalty {
    pub awards: Mutex<Vec<Award>>,
}

impl RecordingLoyalty {
    pub fn awards(&self) -> Vec<Award> {
        self.awards.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoyaltyService for RecordingLoyalty {
    async fn award_points(&self, customer_id: i64, points: i64, reason: &str) -> Result<i64, AppError> {
        let mut awards = self.awards.lock().unwrap();
        awards.push(Award {
            customer_id,
            points,
            reason: reason.to_string(),
        });

        Ok(awards
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .map(|a| a.points)
            .sum())
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Records notify_user calls; notify_admins uses the trait's fan-out over
/// the given directory
pub struct RecordingNotifications {
    users: Arc<dyn UserDirectory>,
    pub sent: Mutex<Vec<(i64, NewNotification)>>,
}

impl Default for RecordingNotifications {
    fn default() -> Self {
        Self::with_users(Arc::new(InMemoryUsers::new(Vec::new())))
    }
}

impl RecordingNotifications {
    pub fn with_users(users: Arc<dyn UserDirectory>) -> Self {
        Self {
            users,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Directory holding one admin-role user per id
    pub fn with_admins(admin_ids: Vec<i64>) -> Self {
        let admins = admin_ids
            .into_iter()
            .map(|id| fixtures::user(id, &format!("Admin {}", id), UserRole::Admin))
            .collect();
        Self::with_users(Arc::new(InMemoryUsers::new(admins)))
    }

    pub fn sent(&self) -> Vec<(i64, NewNotification)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, user_id: i64) -> Vec<NewNotification> {
        self.sent()
            .into_iter()
            .filter(|(recipient, _)| *recipient == user_id)
            .map(|(_, notification)| notification)
            .collect()
    }
}

#[async_trait]
impl NotificationService for RecordingNotifications {
    fn users(&self) -> &dyn UserDirectory {
        self.users.as_ref()
    }

    async fn notify_user(&self, user_id: i64, notification: NewNotification) -> Result<Uuid, AppError> {
        self.sent.lock().unwrap().push((user_id, notification));
        Ok(Uuid::new_v4())
    }
}

// ============================================================================
// Users
// ============================================================================

pub struct InMemoryUsers {
    users: Vec<User>,
}

impl InMemoryUsers {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUsers {
    async fn user_ids_with_role(&self, role: UserRole) -> Result<Vec<i64>, AppError> {
        Ok(self.users.iter().filter(|u| u.role == role).map(|u| u.id).collect())
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }
}

// ============================================================================
// Realtime
// ============================================================================

#[derive(Default)]
pub struct RecordingBroadcaster {
    pub messages: Mutex<Vec<BroadcastMessage>>,
    fail: bool,
}

impl RecordingBroadcaster {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<BroadcastMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl RealtimeBroadcaster for RecordingBroadcaster {
    async fn broadcast(&self, message: &BroadcastMessage) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Transport("connection refused".to_string()));
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Holds orders for a fixed catalog, customer set and delivery zone
pub struct InMemoryOrderRepository {
    products: HashMap<i64, Product>,
    customers: HashMap<i64, CustomerSummary>,
    zone: DeliveryZone,
    orders: Mutex<HashMap<i64, OrderDetails>>,
    next_id: AtomicI64,
}

impl InMemoryOrderRepository {
    pub fn new(products: Vec<Product>, customers: Vec<CustomerSummary>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            customers: customers.into_iter().map(|c| (c.id, c)).collect(),
            zone: fixtures::zone(),
            orders: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn starting_at(self, next_id: i64) -> Self {
        self.next_id.store(next_id, Ordering::SeqCst);
        self
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn stored(&self, order_id: i64) -> Option<OrderDetails> {
        self.orders.lock().unwrap().get(&order_id).cloned()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_products(&self, product_ids: &[i64]) -> Result<HashMap<i64, Product>, AppError> {
        Ok(product_ids
            .iter()
            .filter_map(|id| self.products.get(id).map(|p| (*id, p.clone())))
            .collect())
    }

    async fn insert_order(&self, order: NewOrder) -> Result<i64, AppError> {
        let customer = self
            .customers
            .get(&order.customer_id)
            .cloned()
            .ok_or_else(|| AppError::ForeignKey("orders_customer_id_fkey".to_string()))?;

        let mut items = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let product = self
                .products
                .get(&line.product_id)
                .cloned()
                .ok_or_else(|| AppError::ForeignKey("order_items_product_id_fkey".to_string()))?;
            items.push(OrderLine {
                product,
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let details = OrderDetails {
            order: Order {
                id,
                customer_id: order.customer_id,
                delivery_zone_id: order.delivery_zone_id,
                delivery_address: order.delivery_address,
                total_amount: order.total_amount,
                status: OrderStatus::Pending,
                payment_method: order.payment_method,
                notes: order.notes,
                created_at: now,
                updated_at: now,
            },
            customer,
            items,
            delivery_zone: self.zone.clone(),
        };

        self.orders.lock().unwrap().insert(id, details);
        Ok(id)
    }

    async fn load_details(&self, order_id: i64) -> Result<OrderDetails, AppError> {
        self.stored(order_id)
            .ok_or_else(|| AppError::not_found("Order", order_id))
    }

    async fn update_status(&self, order_id: i64, status: OrderStatus) -> Result<OrderStatus, AppError> {
        let mut orders = self.orders.lock().unwrap();
        let details = orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::not_found("Order", order_id))?;

        let previous = details.order.status;
        details.order.status = status;
        details.order.updated_at = Utc::now();
        Ok(previous)
    }
}
