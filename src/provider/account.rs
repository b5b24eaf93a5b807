//! OAuth `account_credentials` strategy: validate the cached token, refresh it when the
//! server no longer accepts it, and read the bearer back from the store.
//!
//! Only validation failures are recovered locally (by one refresh). Refresh failures and
//! unusable payloads propagate; nothing here ever returns a placeholder credential.

// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenFormatError},
	config::ValidationMode,
	oauth,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, FlowStage},
	provider::TokenProvider,
	store::StoreError,
	validator::{InvalidReason, Validation},
};

/// Slack subtracted from a server-advertised `expires_in` when trusting a token locally.
const EXPIRY_MARGIN: Duration = Duration::seconds(60);

impl TokenProvider {
	/// Returns a bearer the server accepts, refreshing the cached token at most once.
	pub async fn account_token(&self) -> Result<Secret> {
		const KIND: FlowKind = FlowKind::OAuth2;

		let span = FlowSpan::new(KIND, FlowStage::Validate);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let _singleflight = self.refresh_guard.lock().await;
				let now = OffsetDateTime::now_utc();

				if self.is_confirmed_at(now) {
					span.stage(FlowStage::Read);

					match self.stored_access_token().await {
						Ok(token) => return Ok(token),
						Err(_) => {
							self.invalidate();
							span.stage(FlowStage::Validate);
						},
					}
				}

				match self.check_stored_token().await? {
					Validation::Valid => self.confirm(now, None),
					Validation::Invalid(reason) => {
						span.invalidated(&reason);
						obs::record_refresh(&reason);
						span.stage(FlowStage::Refresh);
						self.refresh_stored_token(now).await?;
					},
				}

				span.stage(FlowStage::Read);

				self.stored_access_token().await
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Reads the cached bearer without validating or refreshing it.
	///
	/// Fails with [`Error::MissingToken`] when nothing is cached and with
	/// [`Error::InvalidTokenFormat`] when the payload has no usable `access_token`.
	pub async fn stored_access_token(&self) -> Result<Secret> {
		match self.store.read().await {
			Ok(Some(token)) => Ok(token.access_token().clone()),
			Ok(None) => Err(Error::MissingToken { location: self.store.location() }),
			Err(StoreError::Format(e)) => Err(Error::InvalidTokenFormat(e)),
			Err(e) => Err(Error::Storage(e)),
		}
	}

	/// Requests a new token and persists the raw response, replacing the cached one.
	///
	/// The store is untouched when the exchange fails.
	pub async fn refresh(&self) -> Result<Secret> {
		let span = FlowSpan::new(FlowKind::OAuth2, FlowStage::Refresh);

		span.instrument(async {
			let _singleflight = self.refresh_guard.lock().await;

			self.refresh_stored_token(OffsetDateTime::now_utc()).await?;
			span.stage(FlowStage::Read);

			self.stored_access_token().await
		})
		.await
	}

	async fn check_stored_token(&self) -> Result<Validation> {
		let token = match self.stored_access_token().await {
			Ok(token) => token,
			Err(Error::MissingToken { .. }) => return Ok(Validation::Invalid(InvalidReason::Missing)),
			Err(Error::InvalidTokenFormat(TokenFormatError::Malformed { source })) =>
				return Ok(Validation::Invalid(InvalidReason::Malformed { message: source.to_string() })),
			Err(Error::Storage(StoreError::Backend { message })) =>
				return Ok(Validation::Invalid(InvalidReason::Unreadable { message })),
			Err(e) => return Err(e),
		};

		Ok(self.validator.validate(&token).await)
	}

	async fn refresh_stored_token(&self, now: OffsetDateTime) -> Result<()> {
		let token = oauth::request_account_token(
			&self.http_client,
			&self.config.oauth_token_url,
			&self.credentials,
			self.config.request_timeout,
		)
		.await?;
		let expires_in = token.expires_in();

		self.store.write(token).await?;
		self.confirm(now, expires_in);

		Ok(())
	}

	fn is_confirmed_at(&self, now: OffsetDateTime) -> bool {
		self.confirmed_until.lock().is_some_and(|until| now < until)
	}

	fn confirm(&self, now: OffsetDateTime, expires_in: Option<Duration>) {
		let ValidationMode::TrustConfirmedFor(ttl) = self.config.validation else {
			return;
		};
		// An unrepresentable instant means the bound does not apply.
		let mut until = now.checked_add(ttl);
		let expiry = expires_in.and_then(|lifetime| now.checked_add(lifetime - EXPIRY_MARGIN));

		if let Some(expiry) = expiry {
			until = Some(until.map_or(expiry, |until| until.min(expiry)));
		}

		*self.confirmed_until.lock() = until.filter(|until| *until > now);
	}
}
