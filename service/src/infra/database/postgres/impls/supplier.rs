//! [`Supplier`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{supplier, Supplier},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

impl From<Row> for Supplier {
    fn from(row: Row) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            phone: row.get("phone"),
            created_at: row.get("created_at"),
            deleted_at: row.get("deleted_at"),
        }
    }
}

impl<C> Database<Select<By<Option<Supplier>, supplier::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Supplier>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Supplier>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, email, phone, created_at, deleted_at \
            FROM suppliers \
            WHERE id = $1::UUID";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.map(Supplier::from))
    }
}

impl<C> Database<Insert<Supplier>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Supplier>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(supplier): Insert<Supplier>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(supplier))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Supplier>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(supplier): Update<Supplier>,
    ) -> Result<Self::Ok, Self::Err> {
        let Supplier {
            id,
            name,
            email,
            phone,
            created_at,
            deleted_at,
        } = supplier;

        const SQL: &str = "\
            INSERT INTO suppliers (\
                id, name, email, phone, created_at, deleted_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, \
                $3::VARCHAR, $4::VARCHAR, \
                $5::TIMESTAMPTZ, $6::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[&id, &name, &email, &phone, &created_at, &deleted_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Supplier, supplier::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Supplier, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: supplier::Id = by.into_inner();

        // `DO UPDATE` holds a row lock until the transaction ends, even when
        // the entry already exists.
        const SQL: &str = "\
            INSERT INTO suppliers_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.exec(SQL, &[&id]).await.map_err(tracerr::wrap!()).map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::supplier::list::Page, read::supplier::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::supplier::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::supplier::list::Page, read::supplier::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::supplier::list::Selector {
            arguments,
            filter:
                read::supplier::list::Filter {
                    name,
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
        let name_idx = name.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let name_pattern = name.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let name_pattern_idx = name_pattern.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM suppliers \
             WHERE true \
                   {deleted} \
                   {cursor} \
                   {name_filtering} \
             ORDER BY {name_ordering} \
                      id {order} \
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
            order = arguments.kind().order().sql(),
            name_filtering =
                name_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(name) SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
            name_ordering = name_idx.into_iter().format_with("", |idx, f| {
                let order = arguments.kind().order().sql();
                f(&format_args!(
                    "LEVENSHTEIN(name, ${idx}::VARCHAR, 1, 1, 0) {order},"
                ))
            })
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

        Ok(read::supplier::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::supplier::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::supplier::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::supplier::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM suppliers \
            WHERE deleted_at IS NULL";
        let row = self.query_one(SQL, &[]).await.map_err(tracerr::wrap!())?;
        Ok(row.get::<_, i32>(0).into())
    }
}
