//! Session management for the forum.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::client::ForumClient;
use crate::config::ClientConfig;
use crate::endpoints::{
    self, CommentForm, DARKROOM, HOME, LOGIN, LoginForm, POST_LIST, PostListQuery, RANKLIST, RATE,
    RankListQuery, RateForm, TASK, TaskActionQuery, TaskListQuery,
};
use crate::error::{AuthError, ContentError, InvalidInputError};
use crate::extract::{
    Darkroom, Extract, ForumRankEntry, PollRankEntry, PostList, Ranking, Reply, TaskDetail,
    TaskList, TaskMessage, ThreadInfo, ThreadRankEntry, TopPosts, UserRankEntry,
};
use crate::fetch::{Page, PageLimit, PageSource, fetch_all};
use crate::markers::{self, Endpoint, Outcome};
use crate::types::{
    ForumRankView, ForumUrl, PollRankView, PostId, TaskId, TaskListMode, ThreadId, ThreadRankView,
    UserRankView,
};

use super::credentials::Credentials;
use super::tokens::{Authorization, FormHash};

/// Whether a form submission fetches a fresh formhash first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormHashPolicy {
    /// Fetch the home page and read a fresh formhash before submitting.
    #[default]
    Refresh,
    /// Submit with the cached formhash. Falls back to a refresh when none
    /// is cached. Useful for bursts of ratings.
    Reuse,
}

/// An authenticated connection to the forum.
///
/// A session owns the cookie jar of the legacy login, the cached
/// [`FormHash`] and the JSON API [`Authorization`]. Operations that change
/// any of these take `&mut self`, so one session serves one caller at a
/// time. Build independent sessions for independent work.
///
/// Nothing is retried. In particular a failed [`login`](Session::login) is
/// reported as is; five consecutive failures lock the account upstream.
///
/// # Example
///
/// ```no_run
/// use hepan::{Credentials, ForumUrl, PageLimit, Session, ThreadId};
///
/// # async fn example() -> Result<(), hepan::Error> {
/// let forum = ForumUrl::new("https://bbs.uestc.edu.cn")?;
/// let session = Session::connect(forum, Credentials::new("range6", "hunter2")).await?;
///
/// let replies = session.replies(ThreadId(2287221), PageLimit(2)).await?;
/// println!("{} replies", replies.len());
/// # Ok(())
/// # }
/// ```
pub struct Session {
    client: ForumClient,
    credentials: Credentials,
    formhash: Option<FormHash>,
    authorization: Option<Authorization>,
}

impl Session {
    /// Build an unauthenticated session with default settings.
    pub fn new(forum: ForumUrl, credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::for_forum(forum))
    }

    /// Build an unauthenticated session.
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: ForumClient::new(&config)?,
            credentials,
            formhash: None,
            authorization: None,
        })
    }

    /// Build a session and log in.
    pub async fn connect(forum: ForumUrl, credentials: Credentials) -> Result<Self> {
        let mut session = Self::new(forum, credentials)?;
        session.login().await?;
        Ok(session)
    }

    /// Log in through the legacy form, then obtain a JSON API authorization.
    ///
    /// Any previous authorization is discarded first, so a failed login
    /// leaves the session unauthenticated.
    ///
    /// # Errors
    ///
    /// - [`AuthError::LockedOut`] after too many failed attempts
    /// - [`AuthError::Rejected`] with the server text for any other refusal
    /// - an exchange [`AuthError`] if the token exchange fails
    #[instrument(
        skip(self),
        fields(forum = %self.client.forum(), username = %self.credentials.username())
    )]
    pub async fn login(&mut self) -> Result<()> {
        info!("Logging in");
        self.authorization = None;
        self.formhash = None;

        let form = LoginForm {
            loginfield: "username",
            username: self.credentials.username(),
            password: self.credentials.password(),
        };
        let body = self.client.post_login(LOGIN, &form).await?;

        match markers::classify(Endpoint::Login, &body) {
            Some(Outcome::Success) => {}
            Some(Outcome::LockedOut) => {
                warn!("Account is locked out");
                return Err(AuthError::LockedOut {
                    message: markers::server_message(&body),
                }
                .into());
            }
            None => {
                return Err(AuthError::Rejected {
                    message: markers::server_message(&body),
                }
                .into());
            }
        }

        self.exchange_authorization().await?;
        debug!("Logged in successfully");
        Ok(())
    }

    /// Read a fresh formhash from the home page and cache it.
    #[instrument(skip(self))]
    pub async fn refresh_formhash(&mut self) -> Result<FormHash> {
        let body = self.client.get_html(HOME).await?;
        let formhash = FormHash::extract(&body)?;
        debug!("Formhash refreshed");

        self.formhash = Some(formhash.clone());
        Ok(formhash)
    }

    /// Exchange the cookie session for a JSON API authorization.
    ///
    /// [`login`](Session::login) calls this already. On failure the
    /// session is left without an authorization.
    #[instrument(skip(self))]
    pub async fn exchange_authorization(&mut self) -> Result<()> {
        self.authorization = None;
        let authorization = self.client.adopt_legacy_auth().await?;
        self.authorization = Some(authorization);
        debug!("Authorization obtained");
        Ok(())
    }

    async fn formhash_for(&mut self, policy: FormHashPolicy) -> Result<FormHash> {
        match (policy, &self.formhash) {
            (FormHashPolicy::Reuse, Some(formhash)) => Ok(formhash.clone()),
            (FormHashPolicy::Reuse, None) => {
                debug!("No cached formhash; refreshing");
                self.refresh_formhash().await
            }
            (FormHashPolicy::Refresh, _) => self.refresh_formhash().await,
        }
    }

    fn authorization(&self) -> Result<&Authorization> {
        Ok(self
            .authorization
            .as_ref()
            .ok_or(AuthError::NotAuthenticated)?)
    }

    // ------------------------------------------------------------------
    // Threads and replies (JSON API)
    // ------------------------------------------------------------------

    /// Details of a thread, from the first page of its post list.
    #[instrument(skip(self))]
    pub async fn thread_info(&self, tid: ThreadId) -> Result<ThreadInfo> {
        let query = PostListQuery {
            thread_id: tid.get(),
            page: 1,
            thread_details: 1,
        };
        let list: PostList = self
            .client
            .api_get(POST_LIST, &query, self.authorization()?)
            .await?;
        Ok(list.thread_info(tid)?)
    }

    /// The replies of a thread as a [`PageSource`].
    pub fn reply_pages(&self, tid: ThreadId) -> Result<ReplyPages<'_>> {
        Ok(ReplyPages {
            client: &self.client,
            authorization: self.authorization()?,
            tid,
        })
    }

    /// One page of replies, in floor order.
    pub async fn reply_page(&self, tid: ThreadId, page: u32) -> Result<Page<Reply>> {
        self.reply_pages(tid)?.fetch_page(page).await
    }

    /// All replies of a thread, up to `limit` pages.
    #[instrument(skip(self, limit))]
    pub async fn replies(&self, tid: ThreadId, limit: impl Into<PageLimit>) -> Result<Vec<Reply>> {
        let source = self.reply_pages(tid)?;
        fetch_all(&source, limit.into()).await
    }

    // ------------------------------------------------------------------
    // Form submissions
    // ------------------------------------------------------------------

    /// Rate a post (give or take water drops).
    ///
    /// # Errors
    ///
    /// [`ContentError`] with the server text when the forum does not
    /// confirm the rating: mismatched `tid`/`pid`, an expired formhash, a
    /// deleted thread, insufficient rights or an exhausted daily quota.
    #[instrument(skip(self, reason))]
    pub async fn rate(
        &mut self,
        tid: ThreadId,
        pid: PostId,
        score: i32,
        reason: &str,
        policy: FormHashPolicy,
    ) -> Result<()> {
        let formhash = self.formhash_for(policy).await?;
        let form = RateForm {
            formhash: formhash.as_str(),
            tid: tid.get(),
            pid: pid.get(),
            score2: score,
            reason,
        };
        let body = self.client.post_form(RATE, &form).await?;

        match markers::classify(Endpoint::Rate, &body) {
            Some(Outcome::Success) => {
                info!("Rated post");
                Ok(())
            }
            _ => Err(ContentError::new(markers::server_message(&body))
                .with_context(format!("tid={tid} pid={pid} score={score}"))
                .into()),
        }
    }

    /// Post a review comment under a post.
    ///
    /// The forum answers with a whole page and no success signal, so only a
    /// failed HTTP exchange is reported.
    #[instrument(skip(self, content))]
    pub async fn comment(
        &mut self,
        tid: ThreadId,
        pid: PostId,
        content: &str,
        policy: FormHashPolicy,
    ) -> Result<()> {
        let formhash = self.formhash_for(policy).await?;
        let form = CommentForm {
            formhash: formhash.as_str(),
            handlekey: "comment",
            message: content,
        };
        self.client
            .post_form(&endpoints::comment(tid.get(), pid.get()), &form)
            .await?;
        info!("Comment submitted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Legacy pages
    // ------------------------------------------------------------------

    /// The six thread lists of the home page.
    #[instrument(skip(self))]
    pub async fn top_posts(&self) -> Result<TopPosts> {
        let body = self.client.get_html(HOME).await?;
        Ok(TopPosts::extract(&body)?)
    }

    /// Users currently under moderation sanctions.
    #[instrument(skip(self))]
    pub async fn darkroom(&self) -> Result<Darkroom> {
        let body = self.client.get_html(DARKROOM).await?;
        Ok(Darkroom::extract(&body)?)
    }

    /// A member ranking board. First page only.
    #[instrument(skip(self))]
    pub async fn user_rank(
        &self,
        view: UserRankView,
        orderby: Option<&str>,
    ) -> Result<Ranking<UserRankEntry>> {
        self.ranking(RankListQuery::new("member", view.as_str(), orderby))
            .await
    }

    /// A thread ranking board. First page only.
    #[instrument(skip(self))]
    pub async fn thread_rank(
        &self,
        view: ThreadRankView,
        orderby: Option<&str>,
    ) -> Result<Ranking<ThreadRankEntry>> {
        self.ranking(RankListQuery::new("thread", view.as_str(), orderby))
            .await
    }

    /// A poll ranking board. First page only.
    #[instrument(skip(self))]
    pub async fn poll_rank(
        &self,
        view: PollRankView,
        orderby: Option<&str>,
    ) -> Result<Ranking<PollRankEntry>> {
        self.ranking(RankListQuery::new("poll", view.as_str(), orderby))
            .await
    }

    /// A forum section ranking board.
    #[instrument(skip(self))]
    pub async fn forum_rank(&self, view: ForumRankView) -> Result<Ranking<ForumRankEntry>> {
        self.ranking(RankListQuery::new("forum", view.as_str(), None))
            .await
    }

    async fn ranking<T>(&self, query: RankListQuery<'_>) -> Result<Ranking<T>>
    where
        Ranking<T>: Extract,
    {
        let body = self.client.get_html_with(RANKLIST, &query).await?;
        Ok(Ranking::<T>::extract(&body)?)
    }

    // ------------------------------------------------------------------
    // Task centre
    // ------------------------------------------------------------------

    /// One tab of the task centre.
    #[instrument(skip(self))]
    pub async fn tasks(&self, mode: TaskListMode) -> Result<TaskList> {
        let query = TaskListQuery {
            module: "task",
            item: mode.as_str(),
        };
        let body = self.client.get_html_with(TASK, &query).await?;
        Ok(TaskList::extract(&body)?)
    }

    /// Full description of a task and where this account stands with it.
    #[instrument(skip(self))]
    pub async fn task_info(&self, id: TaskId) -> Result<TaskDetail> {
        let body = self
            .client
            .get_html_with(TASK, &TaskActionQuery::new("view", id.get()))
            .await?;
        Ok(TaskDetail::extract(&body)?)
    }

    /// Apply for a task. Returns the forum's confirmation text.
    #[instrument(skip(self))]
    pub async fn apply_task(&self, id: TaskId) -> Result<String> {
        self.task_action(id, "apply", Endpoint::ApplyTask).await
    }

    /// Claim the reward of a completed task. Returns the forum's
    /// confirmation text.
    #[instrument(skip(self))]
    pub async fn finish_task(&self, id: TaskId) -> Result<String> {
        self.task_action(id, "draw", Endpoint::FinishTask).await
    }

    async fn task_action(
        &self,
        id: TaskId,
        action: &'static str,
        endpoint: Endpoint,
    ) -> Result<String> {
        let body = self
            .client
            .get_html_with(TASK, &TaskActionQuery::new(action, id.get()))
            .await?;
        let TaskMessage(message) = TaskMessage::extract(&body)?;

        match markers::classify(endpoint, &message) {
            Some(Outcome::Success) => {
                info!(%message, "Task {action} succeeded");
                Ok(message)
            }
            _ => Err(ContentError::new(message)
                .with_context(format!("task {id} {action}"))
                .into()),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the username this session logs in with.
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Returns the forum this session talks to.
    pub fn forum(&self) -> &ForumUrl {
        self.client.forum()
    }

    /// Whether a JSON API authorization is held.
    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    /// The cached formhash, if any.
    pub fn formhash(&self) -> Option<&FormHash> {
        self.formhash.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("forum", self.client.forum())
            .field("username", &self.credentials.username())
            .field("authenticated", &self.authorization.is_some())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

/// The reply pages of one thread.
///
/// Borrowed from a [`Session`] via [`Session::reply_pages`]; feed it to
/// [`fetch_all`] or fetch single pages.
pub struct ReplyPages<'a> {
    client: &'a ForumClient,
    authorization: &'a Authorization,
    tid: ThreadId,
}

#[async_trait]
impl PageSource for ReplyPages<'_> {
    type Item = Reply;

    #[instrument(skip(self), fields(tid = %self.tid))]
    async fn fetch_page(&self, page: u32) -> Result<Page<Reply>> {
        if page == 0 {
            return Err(InvalidInputError::Page { page }.into());
        }

        let query = PostListQuery {
            thread_id: self.tid.get(),
            page,
            thread_details: 1,
        };
        let list: PostList = self
            .client
            .api_get(POST_LIST, &query, self.authorization)
            .await?;
        Ok(list.into_reply_page()?)
    }
}

impl fmt::Debug for ReplyPages<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyPages")
            .field("tid", &self.tid)
            .finish_non_exhaustive()
    }
}
