//! 答案详情台账 - 基础设施层
//!
//! 整个批次运行期间唯一的跨任务共享可变状态。
//! 底层是一个预分配的定长数组，每个问题下标恰好写入一次；
//! 不同下标的写入在逻辑上互不相关，但数组本身不能被多个任务
//! 同时写，所以所有写入都在同一把互斥锁下完成。

use crate::models::{AnswerDetail, DetailRef};
use std::sync::Mutex;
use tracing::warn;

/// 答案详情台账
pub struct DetailStore {
    slots: Mutex<Vec<Option<AnswerDetail>>>,
}

impl DetailStore {
    /// 为 N 个问题预分配台账，所有槽位初始为空
    pub fn with_capacity(total: usize) -> Self {
        Self {
            slots: Mutex::new(vec![None; total]),
        }
    }

    /// 台账容量（等于问题总数）
    pub fn len(&self) -> usize {
        self.slots.lock().expect("详情台账锁中毒").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 写入某个下标的详情记录，返回指向该记录的引用
    ///
    /// 每个下标每次运行只写入一次；下标越界时只记录警告，不会 panic。
    pub fn put(&self, index: usize, detail: AnswerDetail) -> DetailRef {
        let detail_ref = DetailRef::new(index);
        let mut slots = self.slots.lock().expect("详情台账锁中毒");
        match slots.get_mut(index) {
            Some(slot) => *slot = Some(detail),
            None => warn!("详情下标 {} 超出台账容量 {}，记录被丢弃", index, slots.len()),
        }
        detail_ref
    }

    /// 读取某个下标的详情记录，未写入或越界时返回 `None`
    pub fn get(&self, index: usize) -> Option<AnswerDetail> {
        let slots = self.slots.lock().expect("详情台账锁中毒");
        slots.get(index).and_then(|slot| slot.clone())
    }

    /// 按字符串引用解析详情记录
    ///
    /// 引用格式不合法或下标越界时返回 `None`，绝不 panic。
    pub fn resolve(&self, pointer: &str) -> Option<AnswerDetail> {
        let detail_ref = DetailRef::parse(pointer)?;
        self.get(detail_ref.index())
    }

    /// 导出台账当前的完整快照（未写入的槽位为 `None`）
    ///
    /// 进度持久化时使用，快照期间持锁，写入者短暂等待。
    pub fn snapshot(&self) -> Vec<Option<AnswerDetail>> {
        self.slots.lock().expect("详情台账锁中毒").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_detail(index: usize) -> AnswerDetail {
        AnswerDetail::from_error(format!("错误 {index}"), DetailRef::new(index))
    }

    #[test]
    fn test_put_and_get() {
        let store = DetailStore::with_capacity(3);
        let detail_ref = store.put(1, error_detail(1));

        assert_eq!(detail_ref.as_pointer(), "#/answer_details/1");
        assert!(store.get(0).is_none());
        assert!(store.get(1).is_some());
    }

    #[test]
    fn test_out_of_range_put_is_ignored() {
        let store = DetailStore::with_capacity(2);
        store.put(5, error_detail(5));

        assert_eq!(store.len(), 2);
        assert!(store.get(5).is_none());
    }

    #[test]
    fn test_resolve_round_trip() {
        let store = DetailStore::with_capacity(4);
        let detail_ref = store.put(2, error_detail(2));

        let resolved = store.resolve(&detail_ref.as_pointer()).unwrap();
        assert_eq!(resolved.self_ref(), "#/answer_details/2");
    }

    #[test]
    fn test_resolve_tolerates_malformed_pointer() {
        let store = DetailStore::with_capacity(2);
        assert!(store.resolve("").is_none());
        assert!(store.resolve("#/answer_details/not_a_number").is_none());
        assert!(store.resolve("#/answer_details/99").is_none());
    }

    #[test]
    fn test_snapshot_keeps_unfilled_slots() {
        let store = DetailStore::with_capacity(3);
        store.put(1, error_detail(1));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot[0].is_none());
        assert!(snapshot[1].is_some());
        assert!(snapshot[2].is_none());
    }

    #[test]
    fn test_concurrent_writers_fill_distinct_slots() {
        use std::sync::Arc;

        let store = Arc::new(DetailStore::with_capacity(32));
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.put(i, error_detail(i));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert!(snapshot.iter().all(|slot| slot.is_some()));
    }
}
