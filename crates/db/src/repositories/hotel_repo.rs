//! Repository for the `hotels` table.

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;
use staybook_core::types::DbId;

use crate::error::StoreResult;
use crate::models::hotel::{CreateHotel, Hotel, UpdateHotel};
use crate::models::hotel_query::{FilterOp, FilterValue, HotelField, HotelFilter, HotelQuery};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, address, phone_numbers, created_at, updated_at";

#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn create(&self, input: &CreateHotel) -> StoreResult<Hotel>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Hotel>>;

    /// One page of the hotels matching `query`, in its sort order.
    async fn list(&self, query: &HotelQuery, limit: i64, offset: i64) -> StoreResult<Vec<Hotel>>;

    /// Number of hotels matching `query`'s filters.
    async fn count(&self, query: &HotelQuery) -> StoreResult<i64>;

    /// Update a hotel. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    async fn update(&self, id: DbId, input: &UpdateHotel) -> StoreResult<Option<Hotel>>;

    /// Delete a hotel together with its rooms and bookings.
    ///
    /// Returns `true` if a hotel was removed.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

pub struct PgHotelRepository {
    pool: DbPool,
}

impl PgHotelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotelRepository for PgHotelRepository {
    async fn create(&self, input: &CreateHotel) -> StoreResult<Hotel> {
        let query = format!(
            "INSERT INTO hotels (name, address, phone_numbers)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let hotel = sqlx::query_as::<_, Hotel>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.phone_numbers)
            .fetch_one(&self.pool)
            .await?;
        Ok(hotel)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Hotel>> {
        let query = format!("SELECT {COLUMNS} FROM hotels WHERE id = $1");
        let hotel = sqlx::query_as::<_, Hotel>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(hotel)
    }

    async fn list(&self, query: &HotelQuery, limit: i64, offset: i64) -> StoreResult<Vec<Hotel>> {
        let bind_idx = query.filters.len() + 1;
        let sql = format!(
            "SELECT {COLUMNS} FROM hotels {where_clause} \
             ORDER BY {order_by} \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            where_clause = where_clause(&query.filters),
            order_by = query.order_by_sql(),
            next_idx = bind_idx + 1,
        );
        let hotels = bind_filters(sqlx::query_as::<_, Hotel>(&sql), &query.filters)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(hotels)
    }

    async fn count(&self, query: &HotelQuery) -> StoreResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM hotels {}",
            where_clause(&query.filters)
        );
        let (count,): (i64,) = bind_filters(sqlx::query_as(&sql), &query.filters)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update(&self, id: DbId, input: &UpdateHotel) -> StoreResult<Option<Hotel>> {
        let query = format!(
            "UPDATE hotels SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone_numbers = COALESCE($4, phone_numbers)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let hotel = sqlx::query_as::<_, Hotel>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.phone_numbers)
            .fetch_optional(&self.pool)
            .await?;
        Ok(hotel)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        // Rooms and bookings go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// `WHERE` clause for `filters`, binding `$1..=$n` in order.
fn where_clause(filters: &[HotelFilter]) -> String {
    let conditions: Vec<String> = filters
        .iter()
        .enumerate()
        .map(|(i, filter)| {
            let idx = i + 1;
            let column = filter.field.column();
            match (filter.field, filter.op) {
                (HotelField::PhoneNumbers, FilterOp::In) => format!("{column} && ${idx}"),
                (HotelField::PhoneNumbers, _) => format!("${idx} = ANY({column})"),
                (_, FilterOp::In) => format!("{column} = ANY(${idx})"),
                (_, op) => format!("{column} {} ${idx}", op.sql()),
            }
        })
        .collect();

    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// Bind one parameter per filter, in the order [`where_clause`] numbers them.
fn bind_filters<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    filters: &[HotelFilter],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for filter in filters {
        query = if filter.op == FilterOp::In {
            match filter.field {
                HotelField::Id => query.bind(filter.ints()),
                HotelField::CreatedAt | HotelField::UpdatedAt => query.bind(filter.times()),
                HotelField::Name | HotelField::Address | HotelField::PhoneNumbers => {
                    query.bind(filter.texts())
                }
            }
        } else {
            match filter.values.as_slice() {
                [FilterValue::Int(value)] => query.bind(*value),
                [FilterValue::Text(value)] => query.bind(value.clone()),
                [FilterValue::Time(value)] => query.bind(*value),
                _ => query.bind(Option::<String>::None),
            }
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_numbers_parameters_in_order() {
        let query = HotelQuery::from_params([
            ("name", "Ritz"),
            ("id[in]", "1,2"),
            ("created_at[lt]", "2024-01-01"),
            ("phone_numbers[in]", "1,2"),
        ])
        .unwrap();
        assert_eq!(
            where_clause(&query.filters),
            "WHERE name = $1 AND id = ANY($2) AND created_at < $3 AND phone_numbers && $4"
        );
        assert_eq!(where_clause(&[]), "");
    }
}
