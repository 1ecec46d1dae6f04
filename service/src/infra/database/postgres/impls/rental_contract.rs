//! [`contract::Rental`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Date, Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        contract::{self, rental},
        customer, equipment,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `rental_contracts` table.
const COLUMNS: &str = "\
    id, equipment_id, customer_id, \
    start_date, end_date, \
    shifts, shift_price, shift_price_currency, \
    status, \
    created_at, deleted_at, \
    version";

impl From<Row> for contract::Rental {
    #[expect(unsafe_code, reason = "`end_date >= start_date` is a constraint")]
    fn from(row: Row) -> Self {
        Self {
            id: row.get("id"),
            equipment_id: row.get("equipment_id"),
            customer_id: row.get("customer_id"),
            period: unsafe {
                rental::Period::new_unchecked(
                    row.get("start_date"),
                    row.get("end_date"),
                )
            },
            shifts: row.get("shifts"),
            shift_price: Money {
                amount: row.get::<_, Decimal>("shift_price"),
                currency: row.get("shift_price_currency"),
            },
            status: row.get("status"),
            created_at: row.get("created_at"),
            deleted_at: row.get("deleted_at"),
            version: row.get("version"),
        }
    }
}

impl<C> Database<Select<By<Option<contract::Rental>, contract::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<contract::Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<contract::Rental>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rental_contracts \
             WHERE id = $1::UUID"
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.map(contract::Rental::from))
    }
}

impl<C> Database<Insert<contract::Rental>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<contract::Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract::Rental {
            id,
            equipment_id,
            customer_id,
            period,
            shifts,
            shift_price,
            status,
            created_at,
            deleted_at,
            version,
        } = contract;

        let sql = format!(
            "INSERT INTO rental_contracts ({COLUMNS}) \
             VALUES (\
                 $1::UUID, $2::UUID, $3::UUID, \
                 $4::DATE, $5::DATE, \
                 $6::INT4, $7::NUMERIC, $8::INT2, \
                 $9::INT2, \
                 $10::TIMESTAMPTZ, $11::TIMESTAMPTZ, \
                 $12::INT4\
             )"
        );
        self.exec(
            &sql,
            &[
                &id,
                &equipment_id,
                &customer_id,
                &period.start(),
                &period.end(),
                &shifts,
                &shift_price.amount,
                &shift_price.currency,
                &status,
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

/// Updates the stored [`contract::Rental`] only if its stored
/// [`contract::Version`] is still the one the provided value was read with.
///
/// Returns the new [`contract::Version`], or [`None`] if the stored one has
/// changed meanwhile.
impl<C> Database<Update<contract::Rental>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<contract::Version>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<contract::Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract::Rental {
            id,
            equipment_id: _,
            customer_id,
            period,
            shifts,
            shift_price,
            status,
            created_at: _,
            deleted_at,
            version,
        } = contract;

        const SQL: &str = "\
            UPDATE rental_contracts \
            SET customer_id = $2::UUID, \
                start_date = $3::DATE, \
                end_date = $4::DATE, \
                shifts = $5::INT4, \
                shift_price = $6::NUMERIC, \
                shift_price_currency = $7::INT2, \
                status = $8::INT2, \
                deleted_at = $9::TIMESTAMPTZ, \
                version = version + 1 \
            WHERE id = $1::UUID \
              AND version = $10::INT4 \
            RETURNING version";
        self.query_opt(
            SQL,
            &[
                &id,
                &customer_id,
                &period.start(),
                &period.end(),
                &shifts,
                &shift_price.amount,
                &shift_price.currency,
                &status,
                &deleted_at,
                &version,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|row| row.map(|r| r.get("version")))
    }
}

impl<C> Database<Lock<By<contract::Rental, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<contract::Rental, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contract::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO rental_contracts_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.exec(SQL, &[&id]).await.map_err(tracerr::wrap!()).map(drop)
    }
}

impl<C>
    Database<
        Select<
            By<
                Option<read::contract::rental::Overlapping>,
                read::contract::rental::Overlap,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::contract::rental::Overlapping>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                Option<read::contract::rental::Overlapping>,
                read::contract::rental::Overlap,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contract::rental::Overlap {
            equipment_id,
            period,
            except,
        } = by.into_inner();
        let open: &[rental::Status] = &rental::Status::OPEN;

        // Inclusive ranges overlap when each starts before the other ends.
        const SQL: &str = "\
            SELECT id \
            FROM rental_contracts \
            WHERE equipment_id = $1::UUID \
              AND deleted_at IS NULL \
              AND status = ANY($2::INT2[]) \
              AND start_date <= $4::DATE \
              AND end_date >= $3::DATE \
              AND ($5::UUID IS NULL OR id <> $5::UUID) \
            ORDER BY start_date \
            LIMIT 1";
        self.query_opt(
            SQL,
            &[&equipment_id, &open, &period.start(), &period.end(), &except],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|row| {
            row.map(|r| read::contract::rental::Overlapping(r.get("id")))
        })
    }
}

impl<C> Database<Select<By<read::contract::rental::HasOpen, customer::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::rental::HasOpen;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::contract::rental::HasOpen, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let customer_id: customer::Id = by.into_inner();
        let open: &[rental::Status] = &rental::Status::OPEN;

        const SQL: &str = "\
            SELECT id \
            FROM rental_contracts \
            WHERE customer_id = $1::UUID \
              AND deleted_at IS NULL \
              AND status = ANY($2::INT2[]) \
            LIMIT 1";
        self.query_opt(SQL, &[&customer_id, &open])
            .await
            .map_err(tracerr::wrap!())
            .map(|r| read::contract::rental::HasOpen(r.is_some()))
    }
}

impl<C> Database<Select<By<read::contract::rental::HasOpen, equipment::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::rental::HasOpen;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::contract::rental::HasOpen, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let equipment_id: equipment::Id = by.into_inner();
        let open: &[rental::Status] = &rental::Status::OPEN;

        const SQL: &str = "\
            SELECT id \
            FROM rental_contracts \
            WHERE equipment_id = $1::UUID \
              AND deleted_at IS NULL \
              AND status = ANY($2::INT2[]) \
            LIMIT 1";
        self.query_opt(SQL, &[&equipment_id, &open])
            .await
            .map_err(tracerr::wrap!())
            .map(|r| read::contract::rental::HasOpen(r.is_some()))
    }
}

impl<C> Database<Select<By<read::contract::rental::Overdue, Date>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::rental::Overdue;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::contract::rental::Overdue, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        let today: Date = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM rental_contracts \
            WHERE status = $1::INT2 \
              AND deleted_at IS NULL \
              AND end_date < $2::DATE \
            ORDER BY end_date";
        Ok(read::contract::rental::Overdue(
            self.query(SQL, &[&rental::Status::Active, &today])
                .await
                .map_err(tracerr::wrap!())?
                .into_iter()
                .map(|row| row.get("id"))
                .collect(),
        ))
    }
}

impl<C>
    Database<
        Select<
            By<
                read::contract::rental::list::Page,
                read::contract::rental::list::Selector,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::rental::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::contract::rental::list::Page,
                read::contract::rental::list::Selector,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contract::rental::list::Selector {
            arguments,
            filter:
                read::contract::rental::list::Filter {
                    equipment_id,
                    customer_id,
                    status,
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
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM rental_contracts \
             WHERE true \
                   {deleted} \
                   {cursor} \
                   {equipment_filtering} \
                   {customer_filtering} \
                   {status_filtering} \
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
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
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

        Ok(read::contract::rental::list::Page::new(
            &arguments, edges, has_more,
        ))
    }
}

impl<C> Database<Select<By<read::contract::rental::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::rental::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::contract::rental::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM rental_contracts \
            WHERE deleted_at IS NULL";
        let row = self.query_one(SQL, &[]).await.map_err(tracerr::wrap!())?;
        Ok(row.get::<_, i32>(0).into())
    }
}
