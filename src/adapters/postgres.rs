use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use std::time::Duration;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::budget::BudgetStore;
use crate::config::DatabaseConfig;
use crate::domain::{
    apply_transaction, AuditEntry, AuditLog, Bet, BetDraft, BetFilter, BudgetSettings, Mode,
    NewNotification, NewTransaction, Notification, Platform, PlatformDraft, PlatformTransaction,
    PlatformUpdate, SupportTicket, TicketDraft, TicketStatus, Tipster, TipsterDraft,
    TipsterUpdate,
};
use crate::error::{BetTrackerError, Result};
use crate::notifier::Notifier;
use crate::stats::{BetSource, DateRange};

const BET_COLUMNS: &str = "id, user_id, mode, date, stake, odds, payout, profit, status, \
     bet_type, hippodrome, platform, tipster_id, description, created_at, updated_at";

const BUDGET_COLUMNS: &str = "id, user_id, mode, daily_limit, weekly_limit, monthly_limit, \
     alert_threshold, alerts_enabled, created_at, updated_at";

const PLATFORM_COLUMNS: &str =
    "id, user_id, mode, name, initial_bankroll, current_bankroll, is_active, created_at, updated_at";

const TRANSACTION_COLUMNS: &str =
    "id, platform_id, kind, amount, balance_after, description, created_at";

const TIPSTER_COLUMNS: &str =
    "id, user_id, name, description, website, is_active, created_at, updated_at";

const NOTIFICATION_COLUMNS: &str = "id, user_id, kind, title, message, is_read, created_at";

const TICKET_COLUMNS: &str =
    "id, user_id, subject, message, category, priority, status, created_at, updated_at";

/// Read a text column into one of the domain enums
fn parse_column<T>(row: &PgRow, column: &str) -> Result<T>
where
    T: for<'a> TryFrom<&'a str, Error = String>,
{
    let raw: String = row.try_get(column)?;
    T::try_from(raw.as_str()).map_err(BetTrackerError::Internal)
}

fn bet_from_row(row: &PgRow) -> Result<Bet> {
    Ok(Bet {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        mode: parse_column(row, "mode")?,
        date: row.try_get("date")?,
        stake: row.try_get("stake")?,
        odds: row.try_get("odds")?,
        payout: row.try_get("payout")?,
        profit: row.try_get("profit")?,
        status: parse_column(row, "status")?,
        bet_type: row.try_get("bet_type")?,
        hippodrome: row.try_get("hippodrome")?,
        platform: row.try_get("platform")?,
        tipster_id: row.try_get("tipster_id")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn budget_from_row(row: &PgRow) -> Result<BudgetSettings> {
    Ok(BudgetSettings {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        mode: parse_column(row, "mode")?,
        daily_limit: row.try_get("daily_limit")?,
        weekly_limit: row.try_get("weekly_limit")?,
        monthly_limit: row.try_get("monthly_limit")?,
        alert_threshold: row.try_get("alert_threshold")?,
        alerts_enabled: row.try_get("alerts_enabled")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn platform_from_row(row: &PgRow) -> Result<Platform> {
    Ok(Platform {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        mode: parse_column(row, "mode")?,
        name: row.try_get("name")?,
        initial_bankroll: row.try_get("initial_bankroll")?,
        current_bankroll: row.try_get("current_bankroll")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn transaction_from_row(row: &PgRow) -> Result<PlatformTransaction> {
    Ok(PlatformTransaction {
        id: row.try_get("id")?,
        platform_id: row.try_get("platform_id")?,
        kind: parse_column(row, "kind")?,
        amount: row.try_get("amount")?,
        balance_after: row.try_get("balance_after")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn tipster_from_row(row: &PgRow) -> Result<Tipster> {
    Ok(Tipster {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        website: row.try_get("website")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn notification_from_row(row: &PgRow) -> Result<Notification> {
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: parse_column(row, "kind")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}

fn ticket_from_row(row: &PgRow) -> Result<SupportTicket> {
    Ok(SupportTicket {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        category: row.try_get("category")?,
        priority: parse_column(row, "priority")?,
        status: parse_column(row, "status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn audit_from_row(row: &PgRow) -> Result<AuditLog> {
    Ok(AuditLog {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        action: row.try_get("action")?,
        entity_type: row.try_get("entity_type")?,
        entity_id: row.try_get("entity_id")?,
        details: row.try_get("details")?,
        created_at: row.try_get("created_at")?,
    })
}

fn push_bet_filters(qb: &mut QueryBuilder<'_, Postgres>, user_id: Uuid, filter: &BetFilter) {
    qb.push(" WHERE user_id = ")
        .push_bind(user_id)
        .push(" AND mode = ")
        .push_bind(filter.mode.as_str());
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(ref platform) = filter.platform {
        qb.push(" AND platform = ").push_bind(platform.clone());
    }
    if let Some(tipster_id) = filter.tipster_id {
        qb.push(" AND tipster_id = ").push_bind(tipster_id);
    }
    if let Some(start) = filter.start {
        qb.push(" AND date >= ").push_bind(start);
    }
    if let Some(end) = filter.end {
        qb.push(" AND date < ").push_bind(end);
    }
}

/// PostgreSQL storage adapter
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a PostgreSQL store from an existing connection pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }

    // ==================== Users ====================

    /// Find or create the user with this email, returning its id
    pub async fn upsert_user(&self, email: &str, display_name: Option<&str>) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, email, display_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET
                display_name = COALESCE(EXCLUDED.display_name, users.display_name),
                updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.trim().to_lowercase())
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    // ==================== Bets ====================

    #[instrument(skip(self, draft))]
    pub async fn insert_bet(&self, user_id: Uuid, draft: &BetDraft) -> Result<Bet> {
        let settlement = draft.settlement()?;
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bets (id, user_id, mode, date, stake, odds, payout, profit, status,
                              bet_type, hippodrome, platform, tipster_id, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {BET_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(draft.mode.as_str())
        .bind(draft.date)
        .bind(draft.stake)
        .bind(draft.odds)
        .bind(settlement.payout)
        .bind(settlement.profit)
        .bind(draft.status.as_str())
        .bind(&draft.bet_type)
        .bind(&draft.hippodrome)
        .bind(&draft.platform)
        .bind(draft.tipster_id)
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await?;

        bet_from_row(&row)
    }

    pub async fn get_bet(&self, user_id: Uuid, id: Uuid) -> Result<Bet> {
        let row = sqlx::query(&format!(
            "SELECT {BET_COLUMNS} FROM bets WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BetTrackerError::not_found("Bet", id))?;

        bet_from_row(&row)
    }

    /// Page of bets matching `filter`, newest first, with the total match count
    pub async fn list_bets(&self, user_id: Uuid, filter: &BetFilter) -> Result<(Vec<Bet>, i64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)::BIGINT FROM bets");
        push_bet_filters(&mut count_qb, user_id, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {BET_COLUMNS} FROM bets"));
        push_bet_filters(&mut qb, user_id, filter);
        qb.push(" ORDER BY date DESC, created_at DESC LIMIT ")
            .push_bind(filter.limit())
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let rows = qb.build().fetch_all(&self.pool).await?;
        let bets = rows.iter().map(bet_from_row).collect::<Result<Vec<_>>>()?;
        Ok((bets, total))
    }

    #[instrument(skip(self, draft))]
    pub async fn update_bet(&self, user_id: Uuid, id: Uuid, draft: &BetDraft) -> Result<Bet> {
        let settlement = draft.settlement()?;
        let row = sqlx::query(&format!(
            r#"
            UPDATE bets SET
                mode = $3, date = $4, stake = $5, odds = $6, payout = $7, profit = $8,
                status = $9, bet_type = $10, hippodrome = $11, platform = $12,
                tipster_id = $13, description = $14, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {BET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(draft.mode.as_str())
        .bind(draft.date)
        .bind(draft.stake)
        .bind(draft.odds)
        .bind(settlement.payout)
        .bind(settlement.profit)
        .bind(draft.status.as_str())
        .bind(&draft.bet_type)
        .bind(&draft.hippodrome)
        .bind(&draft.platform)
        .bind(draft.tipster_id)
        .bind(&draft.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BetTrackerError::not_found("Bet", id))?;

        bet_from_row(&row)
    }

    pub async fn delete_bet(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM bets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BetTrackerError::not_found("Bet", id));
        }
        Ok(())
    }

    // ==================== Platforms ====================

    pub async fn insert_platform(&self, user_id: Uuid, draft: &PlatformDraft) -> Result<Platform> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO platforms (id, user_id, mode, name, initial_bankroll, current_bankroll)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {PLATFORM_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(draft.mode.as_str())
        .bind(draft.name.trim())
        .bind(draft.initial_bankroll)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            BetTrackerError::from_unique_violation(
                e,
                format!("platform '{}' already exists", draft.name.trim()),
            )
        })?;

        platform_from_row(&row)
    }

    pub async fn list_platforms(&self, user_id: Uuid, mode: Mode) -> Result<Vec<Platform>> {
        let rows = sqlx::query(&format!(
            "SELECT {PLATFORM_COLUMNS} FROM platforms WHERE user_id = $1 AND mode = $2 ORDER BY name"
        ))
        .bind(user_id)
        .bind(mode.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(platform_from_row).collect()
    }

    pub async fn get_platform(&self, user_id: Uuid, id: Uuid) -> Result<Platform> {
        let row = sqlx::query(&format!(
            "SELECT {PLATFORM_COLUMNS} FROM platforms WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BetTrackerError::not_found("Platform", id))?;

        platform_from_row(&row)
    }

    pub async fn update_platform(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &PlatformUpdate,
    ) -> Result<Platform> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE platforms SET
                name = COALESCE($3, name),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {PLATFORM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BetTrackerError::from_unique_violation(e, "platform name already in use"))?
        .ok_or_else(|| BetTrackerError::not_found("Platform", id))?;

        platform_from_row(&row)
    }

    pub async fn delete_platform(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM platforms WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BetTrackerError::not_found("Platform", id));
        }
        Ok(())
    }

    pub async fn list_transactions(
        &self,
        user_id: Uuid,
        platform_id: Uuid,
    ) -> Result<Vec<PlatformTransaction>> {
        // Ownership check doubles as the 404 for unknown platforms
        self.get_platform(user_id, platform_id).await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS} FROM platform_transactions
            WHERE platform_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(platform_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(transaction_from_row).collect()
    }

    /// Record a ledger entry and move the bankroll in one database transaction
    #[instrument(skip(self, new))]
    pub async fn create_transaction(
        &self,
        user_id: Uuid,
        platform_id: Uuid,
        new: &NewTransaction,
    ) -> Result<(PlatformTransaction, Platform)> {
        let mut tx = self.pool.begin().await?;

        let balance: Decimal = sqlx::query_scalar(
            "SELECT current_bankroll FROM platforms WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(platform_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| BetTrackerError::not_found("Platform", platform_id))?;

        let new_balance = apply_transaction(balance, new.kind, new.amount)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO platform_transactions (id, platform_id, kind, amount, balance_after, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(platform_id)
        .bind(new.kind.as_str())
        .bind(new.amount)
        .bind(new_balance)
        .bind(&new.description)
        .fetch_one(&mut *tx)
        .await?;
        let transaction = transaction_from_row(&row)?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE platforms SET current_bankroll = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PLATFORM_COLUMNS}
            "#
        ))
        .bind(platform_id)
        .bind(new_balance)
        .fetch_one(&mut *tx)
        .await?;
        let platform = platform_from_row(&row)?;

        tx.commit().await?;
        debug!(%platform_id, %balance, %new_balance, "bankroll updated");
        Ok((transaction, platform))
    }

    // ==================== Tipsters ====================

    pub async fn insert_tipster(&self, user_id: Uuid, draft: &TipsterDraft) -> Result<Tipster> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tipsters (id, user_id, name, description, website)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TIPSTER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(draft.name.trim())
        .bind(&draft.description)
        .bind(&draft.website)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            BetTrackerError::from_unique_violation(
                e,
                format!("tipster '{}' already exists", draft.name.trim()),
            )
        })?;

        tipster_from_row(&row)
    }

    pub async fn list_tipsters(&self, user_id: Uuid) -> Result<Vec<Tipster>> {
        let rows = sqlx::query(&format!(
            "SELECT {TIPSTER_COLUMNS} FROM tipsters WHERE user_id = $1 ORDER BY name"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(tipster_from_row).collect()
    }

    pub async fn get_tipster(&self, user_id: Uuid, id: Uuid) -> Result<Tipster> {
        let row = sqlx::query(&format!(
            "SELECT {TIPSTER_COLUMNS} FROM tipsters WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BetTrackerError::not_found("Tipster", id))?;

        tipster_from_row(&row)
    }

    pub async fn update_tipster(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &TipsterUpdate,
    ) -> Result<Tipster> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE tipsters SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                website = COALESCE($5, website),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TIPSTER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(&update.description)
        .bind(&update.website)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BetTrackerError::from_unique_violation(e, "tipster name already in use"))?
        .ok_or_else(|| BetTrackerError::not_found("Tipster", id))?;

        tipster_from_row(&row)
    }

    pub async fn delete_tipster(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tipsters WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BetTrackerError::not_found("Tipster", id));
        }
        Ok(())
    }

    // ==================== Notifications ====================

    pub async fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3
            "#
        ))
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(notification_from_row).collect()
    }

    pub async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(BetTrackerError::not_found("Notification", id));
        }
        Ok(())
    }

    /// Returns how many notifications changed state
    pub async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // ==================== Support tickets ====================

    pub async fn insert_ticket(&self, user_id: Uuid, draft: &TicketDraft) -> Result<SupportTicket> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO support_tickets (id, user_id, subject, message, category, priority, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'open')
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(draft.subject.trim())
        .bind(draft.message.trim())
        .bind(&draft.category)
        .bind(draft.priority.as_str())
        .fetch_one(&self.pool)
        .await?;

        ticket_from_row(&row)
    }

    pub async fn list_tickets(&self, user_id: Uuid) -> Result<Vec<SupportTicket>> {
        let rows = sqlx::query(&format!(
            "SELECT {TICKET_COLUMNS} FROM support_tickets WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(ticket_from_row).collect()
    }

    pub async fn get_ticket(&self, user_id: Uuid, id: Uuid) -> Result<SupportTicket> {
        let row = sqlx::query(&format!(
            "SELECT {TICKET_COLUMNS} FROM support_tickets WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BetTrackerError::not_found("Ticket", id))?;

        ticket_from_row(&row)
    }

    pub async fn update_ticket_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: TicketStatus,
    ) -> Result<SupportTicket> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE support_tickets SET status = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BetTrackerError::not_found("Ticket", id))?;

        ticket_from_row(&row)
    }

    // ==================== Audit log ====================

    pub async fn record_audit(&self, entry: AuditEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, user_id, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.details)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_audit_logs(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, action, entity_type, entity_id, details, created_at
            FROM audit_logs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(audit_from_row).collect()
    }
}

#[async_trait]
impl BetSource for PostgresStore {
    async fn bets_in_range(
        &self,
        user_id: Uuid,
        mode: Mode,
        range: DateRange,
    ) -> Result<Vec<Bet>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {BET_COLUMNS} FROM bets
            WHERE user_id = $1
              AND mode = $2
              AND ($3::timestamptz IS NULL OR date >= $3)
              AND ($4::timestamptz IS NULL OR date < $4)
            ORDER BY date ASC
            "#
        ))
        .bind(user_id)
        .bind(mode.as_str())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(bet_from_row).collect()
    }
}

#[async_trait]
impl BudgetStore for PostgresStore {
    async fn find_budget_settings(
        &self,
        user_id: Uuid,
        mode: Mode,
    ) -> Result<Option<BudgetSettings>> {
        let row = sqlx::query(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budget_settings WHERE user_id = $1 AND mode = $2"
        ))
        .bind(user_id)
        .bind(mode.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(budget_from_row).transpose()
    }

    async fn create_budget_settings(
        &self,
        user_id: Uuid,
        mode: Mode,
        alert_threshold: i32,
    ) -> Result<BudgetSettings> {
        sqlx::query(
            r#"
            INSERT INTO budget_settings (id, user_id, mode, alert_threshold)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, mode) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(mode.as_str())
        .bind(alert_threshold)
        .execute(&self.pool)
        .await?;

        self.find_budget_settings(user_id, mode)
            .await?
            .ok_or_else(|| BetTrackerError::Internal("budget settings missing after insert".into()))
    }

    async fn save_budget_settings(&self, settings: &BudgetSettings) -> Result<BudgetSettings> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE budget_settings SET
                daily_limit = $2,
                weekly_limit = $3,
                monthly_limit = $4,
                alert_threshold = $5,
                alerts_enabled = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING {BUDGET_COLUMNS}
            "#
        ))
        .bind(settings.id)
        .bind(settings.daily_limit)
        .bind(settings.weekly_limit)
        .bind(settings.monthly_limit)
        .bind(settings.alert_threshold)
        .bind(settings.alerts_enabled)
        .bind(settings.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BetTrackerError::not_found("BudgetSettings", settings.id))?;

        budget_from_row(&row)
    }

    async fn stake_since(
        &self,
        user_id: Uuid,
        mode: Mode,
        since: DateTime<Utc>,
    ) -> Result<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(stake), 0)
            FROM bets
            WHERE user_id = $1 AND mode = $2 AND date >= $3
            "#,
        )
        .bind(user_id)
        .bind(mode.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

#[async_trait]
impl Notifier for PostgresStore {
    async fn notify(&self, notification: NewNotification) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .execute(&self.pool)
        .await?;

        debug!(
            user_id = %notification.user_id,
            kind = notification.kind.as_str(),
            "notification stored"
        );
        Ok(())
    }
}
