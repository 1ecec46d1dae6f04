//! [`Equipment`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{equipment, Equipment},
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

impl From<Row> for Equipment {
    fn from(row: Row) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            serial_number: row.get("serial_number"),
            brand: row.get("brand"),
            kind: row.get("kind"),
            status: row.get("status"),
            supplier_id: row.get("supplier_id"),
            created_at: row.get("created_at"),
            deleted_at: row.get("deleted_at"),
        }
    }
}

impl<C> Database<Select<By<Option<Equipment>, equipment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Equipment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Equipment>, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, serial_number, \
                   brand, kind, status, \
                   supplier_id, \
                   created_at, deleted_at \
            FROM equipment \
            WHERE id = $1::UUID";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.map(Equipment::from))
    }
}

impl<'s, C> Database<Select<By<Option<Equipment>, &'s equipment::SerialNumber>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Equipment>, equipment::Id>>,
        Ok = Option<Equipment>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Equipment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Equipment>, &'s equipment::SerialNumber>>,
    ) -> Result<Self::Ok, Self::Err> {
        let serial_number = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM equipment \
            WHERE serial_number = $1::VARCHAR \
              AND deleted_at IS NULL \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&serial_number])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let equipment_id: equipment::Id = row.get("id");
        self.execute(Select(By::new(equipment_id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Equipment>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Equipment>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(equipment): Insert<Equipment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(equipment))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Equipment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(equipment): Update<Equipment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Equipment {
            id,
            name,
            serial_number,
            brand,
            kind,
            status,
            supplier_id,
            created_at,
            deleted_at,
        } = equipment;

        const SQL: &str = "\
            INSERT INTO equipment (\
                id, name, serial_number, \
                brand, kind, status, \
                supplier_id, \
                created_at, deleted_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::INT2, $5::INT2, $6::INT2, \
                $7::UUID, \
                $8::TIMESTAMPTZ, $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                serial_number = EXCLUDED.serial_number, \
                brand = EXCLUDED.brand, \
                kind = EXCLUDED.kind, \
                status = EXCLUDED.status, \
                supplier_id = EXCLUDED.supplier_id, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &serial_number,
                &brand,
                &kind,
                &status,
                &supplier_id,
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Equipment, equipment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Equipment, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: equipment::Id = by.into_inner();

        // `DO UPDATE` holds a row lock until the transaction ends, even when
        // the entry already exists.
        const SQL: &str = "\
            INSERT INTO equipment_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.exec(SQL, &[&id]).await.map_err(tracerr::wrap!()).map(drop)
    }
}

impl<'s, C> Database<Lock<By<Equipment, &'s equipment::SerialNumber>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Equipment, &'s equipment::SerialNumber>>,
    ) -> Result<Self::Ok, Self::Err> {
        let serial_number = by.into_inner();

        const SQL: &str = "\
            INSERT INTO equipment_serial_number_lock \
            VALUES ($1::VARCHAR) \
            ON CONFLICT (serial_number) \
            DO UPDATE SET serial_number = EXCLUDED.serial_number";
        self.exec(SQL, &[&serial_number])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<
            By<read::equipment::list::Page, read::equipment::list::Selector>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::equipment::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::equipment::list::Page, read::equipment::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::equipment::list::Selector {
            arguments,
            filter:
                read::equipment::list::Filter {
                    name,
                    status,
                    supplier_id,
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
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let supplier_idx = supplier_id.as_ref().map(|s| {
            ps.push(s);
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
             FROM equipment \
             WHERE true \
                   {deleted} \
                   {cursor} \
                   {status_filtering} \
                   {supplier_filtering} \
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
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            supplier_filtering =
                supplier_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND supplier_id = ${idx}::UUID"))
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

        Ok(read::equipment::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::equipment::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::equipment::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::equipment::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM equipment \
            WHERE deleted_at IS NULL";
        let row = self.query_one(SQL, &[]).await.map_err(tracerr::wrap!())?;
        Ok(row.get::<_, i32>(0).into())
    }
}
