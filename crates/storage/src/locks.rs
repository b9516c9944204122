use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 按键互斥表:同键写入串行,不同键互不阻塞
pub(crate) struct KeyLocks {
    cells: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    pub async fn acquire(&self, key: String) -> OwnedMutexGuard<()> {
        let cell = {
            let mut map = self.cells.lock().unwrap();
            // 无人持有的旧键顺手回收,表不随历史键无限增长
            map.retain(|_, cell| Arc::strong_count(cell) > 1);
            map.entry(key)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        cell.lock_owned().await
    }
}
