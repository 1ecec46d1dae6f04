//! [`contract::Selling`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{contract, equipment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `selling_contracts` table.
const COLUMNS: &str = "\
    id, equipment_id, customer_id, \
    sale_price, sale_price_currency, sale_date, \
    created_at, deleted_at, \
    version";

impl From<Row> for contract::Selling {
    fn from(row: Row) -> Self {
        Self {
            id: row.get("id"),
            equipment_id: row.get("equipment_id"),
            customer_id: row.get("customer_id"),
            sale_price: Money {
                amount: row.get::<_, Decimal>("sale_price"),
                currency: row.get("sale_price_currency"),
            },
            sale_date: row.get("sale_date"),
            created_at: row.get("created_at"),
            deleted_at: row.get("deleted_at"),
            version: row.get("version"),
        }
    }
}

impl<C> Database<Select<By<Option<contract::Selling>, contract::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<contract::Selling>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<contract::Selling>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM selling_contracts \
             WHERE id = $1::UUID"
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.map(contract::Selling::from))
    }
}

/// Selects the non-deleted [`contract::Selling`] of an [`Equipment`].
///
/// [`Equipment`]: crate::domain::Equipment
impl<C> Database<Select<By<Option<contract::Selling>, equipment::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<contract::Selling>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<contract::Selling>, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let equipment_id: equipment::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM selling_contracts \
             WHERE equipment_id = $1::UUID \
               AND deleted_at IS NULL \
             LIMIT 1"
        );
        self.query_opt(&sql, &[&equipment_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.map(contract::Selling::from))
    }
}

impl<C> Database<Insert<contract::Selling>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<contract::Selling>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract::Selling {
            id,
            equipment_id,
            customer_id,
            sale_price,
            sale_date,
            created_at,
            deleted_at,
            version,
        } = contract;

        let sql = format!(
            "INSERT INTO selling_contracts ({COLUMNS}) \
             VALUES (\
                 $1::UUID, $2::UUID, $3::UUID, \
                 $4::NUMERIC, $5::INT2, $6::DATE, \
                 $7::TIMESTAMPTZ, $8::TIMESTAMPTZ, \
                 $9::INT4\
             )"
        );
        self.exec(
            &sql,
            &[
                &id,
                &equipment_id,
                &customer_id,
                &sale_price.amount,
                &sale_price.currency,
                &sale_date,
                &created_at,
                &deleted_at,
                &version,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

/// Updates the stored [`contract::Selling`] only if its stored
/// [`contract::Version`] is still the one the provided value was read with.
///
/// Returns the new [`contract::Version`], or [`None`] if the stored one has
/// changed meanwhile.
impl<C> Database<Update<contract::Selling>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<contract::Version>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<contract::Selling>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract::Selling {
            id,
            equipment_id: _,
            customer_id,
            sale_price,
            sale_date,
            created_at: _,
            deleted_at,
            version,
        } = contract;

        const SQL: &str = "\
            UPDATE selling_contracts \
            SET customer_id = $2::UUID, \
                sale_price = $3::NUMERIC, \
                sale_price_currency = $4::INT2, \
                sale_date = $5::DATE, \
                deleted_at = $6::TIMESTAMPTZ, \
                version = version + 1 \
            WHERE id = $1::UUID \
              AND version = $7::INT4 \
            RETURNING version";
        self.query_opt(
            SQL,
            &[
                &id,
                &customer_id,
                &sale_price.amount,
                &sale_price.currency,
                &sale_date,
                &deleted_at,
                &version,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|row| row.map(|r| r.get("version")))
    }
}

impl<C> Database<Lock<By<contract::Selling, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<contract::Selling, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contract::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO selling_contracts_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.exec(SQL, &[&id]).await.map_err(tracerr::wrap!()).map(drop)
    }
}

impl<C>
    Database<
        Select<
            By<
                read::contract::selling::list::Page,
                read::contract::selling::list::Selector,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::selling::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::contract::selling::list::Page,
                read::contract::selling::list::Selector,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contract::selling::list::Selector {
            arguments,
            filter:
                read::contract::selling::list::Filter {
                    equipment_id,
                    customer_id,
                    include_deleted,
                },
        } = by.into_inner();

        let limit =
            i32::try_from(arguments.limit()).unwrap_or(i32::MAX - 1) + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let equipment_idx = equipment_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let customer_idx = customer_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM selling_contracts \
             WHERE true \
                   {deleted} \
                   {cursor} \
                   {equipment_filtering} \
                   {customer_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            deleted = if include_deleted {
                ""
            } else {
                "AND deleted_at IS NULL"
            },
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            equipment_filtering =
                equipment_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND equipment_id = ${idx}::UUID"))
                }),
            customer_filtering =
                customer_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND customer_id = ${idx}::UUID"))
                }),
            order = arguments.kind().order().sql(),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::contract::selling::list::Page::new(
            &arguments, edges, has_more,
        ))
    }
}

impl<C> Database<Select<By<read::contract::selling::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::selling::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::contract::selling::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM selling_contracts \
            WHERE deleted_at IS NULL";
        let row = self.query_one(SQL, &[]).await.map_err(tracerr::wrap!())?;
        Ok(row.get::<_, i32>(0).into())
    }
}
