use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderLineInput, OrderStatus, OrderView};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn load_view(conn: &mut PgConnection, order: OrderRow) -> Result<OrderView, DomainError> {
    let items = order_items::table
        .filter(order_items::order_id.eq(order.id))
        .select(OrderItemRow::as_select())
        .order(order_items::line_no.asc())
        .load(conn)?;
    order.into_view(items)
}

impl OrderRepository for DieselOrderRepository {
    fn create(
        &self,
        user_id: Uuid,
        total_amount: BigDecimal,
        lines: Vec<OrderLineInput>,
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order
            let order = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: Uuid::new_v4(),
                    user_id,
                    total_amount,
                    status: OrderStatus::Pending.as_str().to_string(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 2. Insert its lines with the snapshotted prices
            let new_items: Vec<NewOrderItemRow> = lines
                .into_iter()
                .zip(0..)
                .map(|(l, line_no)| NewOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id: order.id,
                    line_no,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect();
            let mut items: Vec<OrderItemRow> = diesel::insert_into(order_items::table)
                .values(&new_items)
                .returning(OrderItemRow::as_returning())
                .get_results(conn)?;
            items.sort_by_key(|i| i.line_no);

            order.into_view(items)
        })
    }

    fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        load_view(&mut conn, order).map(Some)
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        let items = OrderItemRow::belonging_to(&rows)
            .select(OrderItemRow::as_select())
            .order(order_items::line_no.asc())
            .load(&mut conn)?
            .grouped_by(&rows);

        rows.into_iter()
            .zip(items)
            .map(|(order, items)| order.into_view(items))
            .collect()
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = diesel::update(orders::table.filter(orders::id.eq(id)))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        load_view(&mut conn, order).map(Some)
    }
}
