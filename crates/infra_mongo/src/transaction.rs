//! Multi-document transactions
//!
//! A [`Transaction`] owns a client session with an open transaction. Pass
//! [`Transaction::session`] to the `session_*` repository operations, then
//! commit. Dropping an uncommitted transaction ends the session and the
//! server discards its writes.
//!
//! ```rust,ignore
//! let mut tx = context.begin_transaction().await?;
//! customers.session_insert(tx.session(), &customer).await?;
//! orders.session_insert_or_update(tx.session(), doc! { "number": 7 }, &order).await?;
//! tx.commit().await?;
//! ```
//!
//! Transactions require a replica set or sharded cluster.

use mongodb::{Client, ClientSession};
use tracing::{debug, instrument};

use crate::error::DatabaseError;

/// An open transaction on a client session
pub struct Transaction {
    session: ClientSession,
}

impl Transaction {
    /// Starts a session on `client` and opens a transaction on it
    #[instrument(skip(client))]
    pub async fn begin(client: &Client) -> Result<Self, DatabaseError> {
        let mut session = client.start_session().await?;
        session.start_transaction().await?;
        debug!("Transaction started");
        Ok(Self { session })
    }

    /// Wraps a session whose transaction the caller already started
    pub fn from_session(session: ClientSession) -> Self {
        Self { session }
    }

    /// Returns the session to pass to session-scoped repository calls
    pub fn session(&mut self) -> &mut ClientSession {
        &mut self.session
    }

    /// Commits the transaction
    ///
    /// A failure is returned as the driver reports it; check
    /// [`DatabaseError::is_transient`] to decide whether to rerun the work.
    #[instrument(skip(self))]
    pub async fn commit(mut self) -> Result<(), DatabaseError> {
        self.session.commit_transaction().await?;
        debug!("Transaction committed");
        Ok(())
    }

    /// Aborts the transaction, discarding its writes
    #[instrument(skip(self))]
    pub async fn abort(mut self) -> Result<(), DatabaseError> {
        self.session.abort_transaction().await?;
        debug!("Transaction aborted");
        Ok(())
    }

    /// Releases the underlying session
    pub fn into_session(self) -> ClientSession {
        self.session
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("session_id", self.session.id())
            .finish()
    }
}
