use domain::{ActorId, AppError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::LimitSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionClass {
    Vote,
    Flag,
    CommentCreate,
    PostCreate,
}

impl ActionClass {
    fn noun(&self) -> &'static str {
        match self {
            Self::Vote => "voting",
            Self::Flag => "flagging",
            Self::CommentCreate => "commenting",
            Self::PostCreate => "posting",
        }
    }
}

/// 滑动窗口限流:按 (actor, 动作类) 记录窗口内的时间点。
/// 拒绝不占预算;放行在同一把锁里恰好记一次。
#[derive(Clone)]
pub struct RateGuard {
    windows: Arc<Mutex<HashMap<(ActorId, ActionClass), VecDeque<Instant>>>>,
    limits: LimitSettings,
}

impl RateGuard {
    pub fn new(limits: LimitSettings) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            limits,
        }
    }

    fn budget(&self, class: ActionClass) -> (u32, Duration) {
        let b = match class {
            ActionClass::Vote => self.limits.vote,
            ActionClass::Flag => self.limits.flag,
            ActionClass::CommentCreate => self.limits.comment,
            ActionClass::PostCreate => self.limits.post,
        };
        (b.budget, Duration::from_secs(b.window_secs))
    }

    pub fn check(&self, actor: &ActorId, class: ActionClass) -> bool {
        self.check_at(actor, class, Instant::now())
    }

    /// 放行则返回 Ok,否则携带按动作类措辞的 RateLimited
    pub fn enforce(&self, actor: &ActorId, class: ActionClass) -> Result<(), AppError> {
        if self.check(actor, class) {
            Ok(())
        } else {
            Err(AppError::RateLimited(format!(
                "you're {} too frequently, please wait a moment",
                class.noun()
            )))
        }
    }

    fn check_at(&self, actor: &ActorId, class: ActionClass, now: Instant) -> bool {
        let (budget, window) = self.budget(class);
        let mut map = self.windows.lock().unwrap();

        let entry = map.entry((actor.clone(), class)).or_default();
        while entry
            .front()
            .is_some_and(|t| now.duration_since(*t) >= window)
        {
            entry.pop_front();
        }

        if entry.len() as u32 >= budget {
            return false;
        }
        entry.push_back(now);
        true
    }
}
