//! Repository for the `workflow_transitions` and `workflow_issue_types` tables.
//!
//! Operations that touch more than one row of a workflow (chain creation,
//! rebuild, issue-type replacement) run inside a single transaction and lock
//! the workflow's rows first, so readers never see a half-rebuilt workflow.

use std::collections::{HashMap, HashSet};

use issueflow_core::status_order::chain_pairs;
use issueflow_core::types::DbId;
use issueflow_core::workflow_chain::{reconstruct_chain, Edge};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::issue_type::IssueType;
use crate::models::status::Status;
use crate::models::workflow::{
    CreateTransition, CreateWorkflowChain, OrderedStatus, UpdateTransition, WorkflowTransition,
    WorkflowTransitionDetail, WorkflowWithStatuses,
};
use crate::repositories::StatusRepo;

/// Column list for the `workflow_transitions` table.
const COLUMNS: &str = "id, name, description, from_status_id, to_status_id, issue_type_id, \
    created_at, updated_at";

/// Column list for the `issue_types` table (used in JOIN queries).
const ISSUE_TYPE_COLUMNS: &str = "it.id, it.name, it.color, it.icon, it.created_at, it.updated_at";

/// Provides CRUD operations for workflow edges and their issue-type associations.
pub struct WorkflowRepo;

impl WorkflowRepo {
    /// Insert a single edge and associate it with `input.issue_type_ids`.
    ///
    /// The edge is not required to connect to the rest of its workflow.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTransition,
    ) -> Result<WorkflowTransition, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let edge = Self::insert_edge(
            &mut tx,
            input.name.trim(),
            input.description.as_deref(),
            input.from_status_id,
            input.to_status_id,
            input.issue_type_id,
        )
        .await?;
        Self::insert_associations(&mut tx, edge.id, &input.issue_type_ids).await?;

        tx.commit().await?;
        tracing::debug!(workflow_id = edge.id, workflow = %edge.name, "Created workflow edge");
        Ok(edge)
    }

    /// Insert an initial edge, then immediately rebuild its workflow from
    /// `status_ids` (already sorted into pipeline order).
    ///
    /// Both steps commit together. Returns the rebuilt edges; the first one's
    /// id identifies the workflow from now on.
    pub async fn create_with_statuses(
        pool: &PgPool,
        input: &CreateTransition,
        status_ids: &[DbId],
    ) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let anchor = Self::insert_edge(
            &mut tx,
            input.name.trim(),
            input.description.as_deref(),
            input.from_status_id,
            input.to_status_id,
            input.issue_type_id,
        )
        .await?;
        Self::insert_associations(&mut tx, anchor.id, &input.issue_type_ids).await?;

        Self::lock_workflow(&mut tx, &anchor.name).await?;
        let edges = Self::rebuild_inner(&mut tx, &anchor, status_ids).await?;

        tx.commit().await?;
        Ok(edges)
    }

    /// Create a workflow from an ordered status list: one edge per adjacent
    /// pair, each associated with every issue type in the input.
    ///
    /// Callers validate the status list first (at least two, no repeats).
    pub async fn create_chain(
        pool: &PgPool,
        input: &CreateWorkflowChain,
    ) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let name = input.name.trim();

        let mut edges = Vec::with_capacity(input.status_ids.len().saturating_sub(1));
        for (from, to) in chain_pairs(&input.status_ids) {
            let edge =
                Self::insert_edge(&mut tx, name, input.description.as_deref(), from, to, None)
                    .await?;
            Self::insert_associations(&mut tx, edge.id, &input.issue_type_ids).await?;
            edges.push(edge);
        }

        tx.commit().await?;
        tracing::info!(workflow = %name, edges = edges.len(), "Created workflow chain");
        Ok(edges)
    }

    /// Find an edge by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkflowTransition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_transitions WHERE id = $1");
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every edge, grouped by workflow name.
    pub async fn list(pool: &PgPool) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_transitions ORDER BY name, id");
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .fetch_all(pool)
            .await
    }

    /// All edges of one workflow in ascending id order.
    pub async fn list_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_transitions WHERE name = $1 ORDER BY id");
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }

    /// Whether any edge already uses this workflow name.
    pub async fn name_exists(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM workflow_transitions WHERE name = $1)",
        )
        .bind(name.trim())
        .fetch_one(pool)
        .await
    }

    /// Every edge of every workflow associated with `issue_type_id`.
    ///
    /// A workflow counts as associated when any of its edges has an
    /// association row, so edges added later without associations are still
    /// returned with the rest of their workflow.
    pub async fn list_by_issue_type(
        pool: &PgPool,
        issue_type_id: DbId,
    ) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_transitions \
             WHERE name IN ( \
                SELECT wt.name FROM workflow_transitions wt \
                JOIN workflow_issue_types wit ON wit.workflow_id = wt.id \
                WHERE wit.issue_type_id = $1 \
             ) \
             ORDER BY name, id"
        );
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(issue_type_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the core fields of one edge and its issue-type associations.
    ///
    /// A new name renames the whole workflow: every edge sharing the old
    /// name moves to the new one in the same transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTransition,
    ) -> Result<Option<WorkflowTransition>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some((current, _)) = Self::lock_workflow_of(&mut tx, id).await? else {
            return Ok(None);
        };

        let name = input.name.trim();
        if current.name != name {
            let renamed = sqlx::query("UPDATE workflow_transitions SET name = $2 WHERE name = $1")
                .bind(&current.name)
                .bind(name)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::info!(from = %current.name, to = %name, edges = renamed, "Renamed workflow");
        }

        let query = format!(
            "UPDATE workflow_transitions SET \
                description = $2, \
                from_status_id = $3, \
                to_status_id = $4 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let edge = sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(input.from_status_id)
            .bind(input.to_status_id)
            .fetch_one(&mut *tx)
            .await?;

        Self::replace_associations(&mut tx, id, &input.issue_type_ids).await?;

        tx.commit().await?;
        Ok(Some(edge))
    }

    /// Delete one edge by ID. Its associations are removed by cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflow_transitions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the edge `from -> to` of the workflow that `workflow_id`
    /// belongs to. Only one edge is removed even if duplicates exist (the
    /// lowest id); other edges of the workflow are untouched.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_by_triple(
        pool: &PgPool,
        workflow_id: DbId,
        from_status_id: DbId,
        to_status_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM workflow_transitions WHERE id = ( \
                SELECT t.id FROM workflow_transitions t \
                JOIN workflow_transitions anchor ON anchor.name = t.name \
                WHERE anchor.id = $1 \
                  AND t.from_status_id = $2 \
                  AND t.to_status_id = $3 \
                ORDER BY t.id \
                LIMIT 1 \
             )",
        )
        .bind(workflow_id)
        .bind(from_status_id)
        .bind(to_status_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace every edge of the workflow containing edge `id` with a chain
    /// through `status_ids` (already sorted into pipeline order), keeping the
    /// workflow's name, description and issue types.
    ///
    /// Returns `None` if no row with the given `id` exists. The ids of the
    /// returned edges are all new.
    pub async fn rebuild(
        pool: &PgPool,
        id: DbId,
        status_ids: &[DbId],
    ) -> Result<Option<Vec<WorkflowTransition>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some((anchor, _)) = Self::lock_workflow_of(&mut tx, id).await? else {
            return Ok(None);
        };
        let edges = Self::rebuild_inner(&mut tx, &anchor, status_ids).await?;

        tx.commit().await?;
        Ok(Some(edges))
    }

    // -----------------------------------------------------------------------
    // Issue type association helpers
    // -----------------------------------------------------------------------

    /// Replace the issue types of the whole workflow containing edge `id`.
    ///
    /// Every edge of the workflow ends up associated with exactly
    /// `issue_type_ids`. Returns `false` if no row with the given `id` exists.
    pub async fn set_issue_types(
        pool: &PgPool,
        id: DbId,
        issue_type_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some((anchor, edge_ids)) = Self::lock_workflow_of(&mut tx, id).await? else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM workflow_issue_types WHERE workflow_id = ANY($1)")
            .bind(&edge_ids)
            .execute(&mut *tx)
            .await?;

        for &edge_id in &edge_ids {
            Self::insert_associations(&mut tx, edge_id, issue_type_ids).await?;
        }

        tx.commit().await?;
        tracing::info!(
            workflow = %anchor.name,
            edges = edge_ids.len(),
            issue_types = issue_type_ids.len(),
            "Replaced workflow issue types"
        );
        Ok(true)
    }

    /// Distinct issue types associated with any edge of the named workflow.
    pub async fn issue_types_for_workflow(
        pool: &PgPool,
        name: &str,
    ) -> Result<Vec<IssueType>, sqlx::Error> {
        let query = format!(
            "SELECT {ISSUE_TYPE_COLUMNS} \
             FROM issue_types it \
             WHERE it.id IN ( \
                SELECT wit.issue_type_id FROM workflow_issue_types wit \
                JOIN workflow_transitions t ON t.id = wit.workflow_id \
                WHERE t.name = $1 \
             ) \
             ORDER BY it.name"
        );
        sqlx::query_as::<_, IssueType>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Enriched reads
    // -----------------------------------------------------------------------

    /// Resolve statuses and workflow issue types for a batch of edges.
    pub async fn with_details(
        pool: &PgPool,
        transitions: Vec<WorkflowTransition>,
    ) -> Result<Vec<WorkflowTransitionDetail>, sqlx::Error> {
        let status_ids: Vec<DbId> = transitions
            .iter()
            .flat_map(|t| [t.from_status_id, t.to_status_id])
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let statuses: HashMap<DbId, Status> = StatusRepo::find_by_ids(pool, &status_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut issue_types_by_name: HashMap<String, Vec<IssueType>> = HashMap::new();
        let mut result = Vec::with_capacity(transitions.len());

        for transition in transitions {
            if !issue_types_by_name.contains_key(&transition.name) {
                let issue_types = Self::issue_types_for_workflow(pool, &transition.name).await?;
                issue_types_by_name.insert(transition.name.clone(), issue_types);
            }

            let from_status = statuses
                .get(&transition.from_status_id)
                .cloned()
                .ok_or(sqlx::Error::RowNotFound)?;
            let to_status = statuses
                .get(&transition.to_status_id)
                .cloned()
                .ok_or(sqlx::Error::RowNotFound)?;
            let issue_types = issue_types_by_name
                .get(&transition.name)
                .cloned()
                .unwrap_or_default();

            result.push(WorkflowTransitionDetail {
                transition,
                from_status,
                to_status,
                issue_types,
            });
        }

        Ok(result)
    }

    /// Find an edge by ID, enriched with statuses and issue types.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkflowTransitionDetail>, sqlx::Error> {
        let Some(transition) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let mut details = Self::with_details(pool, vec![transition]).await?;
        Ok(details.pop())
    }

    /// Reconstruct the ordered pipeline of the workflow `transition` belongs to.
    ///
    /// The edge's own `from_status_id` is the fallback start for a workflow
    /// whose edges form a pure cycle.
    pub async fn ordered_statuses(
        pool: &PgPool,
        transition: &WorkflowTransition,
    ) -> Result<Vec<OrderedStatus>, sqlx::Error> {
        let edges: Vec<Edge> = Self::list_by_name(pool, &transition.name)
            .await?
            .iter()
            .map(WorkflowTransition::edge)
            .collect();

        let chain = reconstruct_chain(&edges, transition.from_status_id);
        if chain.cycle_detected || !chain.ambiguous_sources.is_empty() {
            tracing::warn!(
                workflow = %transition.name,
                cycle_detected = chain.cycle_detected,
                ambiguous_sources = ?chain.ambiguous_sources,
                "Workflow edges do not form a simple chain, using best-effort order"
            );
        }

        let statuses: HashMap<DbId, Status> = StatusRepo::find_by_ids(pool, &chain.status_ids())
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let ordered = chain
            .entries
            .iter()
            .filter_map(|entry| {
                statuses.get(&entry.status_id).map(|s| OrderedStatus {
                    status_id: s.id,
                    name: s.name.clone(),
                    description: s.description.clone(),
                    color: s.color.clone(),
                    order: entry.order,
                })
            })
            .collect();

        Ok(ordered)
    }

    /// Find an edge by ID with its details and its workflow's ordered pipeline.
    pub async fn find_with_statuses(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkflowWithStatuses>, sqlx::Error> {
        let Some(detail) = Self::find_detail_by_id(pool, id).await? else {
            return Ok(None);
        };
        let statuses = Self::ordered_statuses(pool, &detail.transition).await?;
        Ok(Some(WorkflowWithStatuses { detail, statuses }))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Insert one edge within an existing transaction.
    async fn insert_edge(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        description: Option<&str>,
        from_status_id: DbId,
        to_status_id: DbId,
        issue_type_id: Option<DbId>,
    ) -> Result<WorkflowTransition, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_transitions \
                (name, description, from_status_id, to_status_id, issue_type_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(name)
            .bind(description)
            .bind(from_status_id)
            .bind(to_status_id)
            .bind(issue_type_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Associate one edge with each issue type (idempotent).
    async fn insert_associations(
        tx: &mut Transaction<'_, Postgres>,
        workflow_id: DbId,
        issue_type_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        for &issue_type_id in issue_type_ids {
            sqlx::query(
                "INSERT INTO workflow_issue_types (workflow_id, issue_type_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(workflow_id)
            .bind(issue_type_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Replace one edge's associations within an existing transaction.
    async fn replace_associations(
        tx: &mut Transaction<'_, Postgres>,
        workflow_id: DbId,
        issue_type_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM workflow_issue_types WHERE workflow_id = $1")
            .bind(workflow_id)
            .execute(&mut **tx)
            .await?;
        Self::insert_associations(tx, workflow_id, issue_type_ids).await
    }

    /// Row-lock every edge of the workflow containing edge `id`.
    ///
    /// The anchor is read without a lock and the group is then locked in
    /// ascending id order, so writers to one workflow always take row locks
    /// in the same order. Returns `None` if the anchor no longer belongs to
    /// the locked group (deleted or renamed in between).
    async fn lock_workflow_of(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<(WorkflowTransition, Vec<DbId>)>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_transitions WHERE id = $1");
        let Some(anchor) = sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        let edge_ids = Self::lock_workflow(tx, &anchor.name).await?;
        if !edge_ids.contains(&id) {
            return Ok(None);
        }

        // Re-read under the lock; the first read may be stale.
        let anchor = sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(Some((anchor, edge_ids)))
    }

    /// Row-lock every edge of a workflow, returning their ids in order.
    async fn lock_workflow(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM workflow_transitions WHERE name = $1 ORDER BY id FOR UPDATE",
        )
        .bind(name)
        .fetch_all(&mut **tx)
        .await
    }

    /// Issue types attached to any edge of a workflow.
    async fn workflow_issue_type_ids(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT wit.issue_type_id \
             FROM workflow_issue_types wit \
             JOIN workflow_transitions t ON t.id = wit.workflow_id \
             WHERE t.name = $1 \
             ORDER BY wit.issue_type_id",
        )
        .bind(name)
        .fetch_all(&mut **tx)
        .await
    }

    /// Delete and recreate a workflow's edges within an existing transaction.
    ///
    /// Callers hold the row locks of the workflow.
    async fn rebuild_inner(
        tx: &mut Transaction<'_, Postgres>,
        anchor: &WorkflowTransition,
        status_ids: &[DbId],
    ) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        let issue_type_ids = Self::workflow_issue_type_ids(tx, &anchor.name).await?;

        let removed = sqlx::query("DELETE FROM workflow_transitions WHERE name = $1")
            .bind(&anchor.name)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        let mut edges = Vec::with_capacity(status_ids.len().saturating_sub(1));
        for (from, to) in chain_pairs(status_ids) {
            let edge = Self::insert_edge(
                tx,
                &anchor.name,
                anchor.description.as_deref(),
                from,
                to,
                anchor.issue_type_id,
            )
            .await?;
            Self::insert_associations(tx, edge.id, &issue_type_ids).await?;
            edges.push(edge);
        }

        tracing::info!(
            workflow = %anchor.name,
            removed,
            created = edges.len(),
            issue_types = issue_type_ids.len(),
            "Rebuilt workflow edges"
        );
        Ok(edges)
    }
}
