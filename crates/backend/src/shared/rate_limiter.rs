use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Ограничитель скорости для bulk-отправки: не более max_requests
/// запросов за скользящее окно window. Заменяет жестко зашитую паузу
/// "100ms каждые 10 строк" из первой версии импортера: политика
/// настраивается через config и тестируется без sleep'ов.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    history: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1) as usize,
            window,
            history: VecDeque::new(),
        }
    }

    /// Сколько ждать перед следующим запросом в момент now.
    /// None — слот свободен, запрос можно отправлять сразу.
    fn next_delay(&mut self, now: Instant) -> Option<Duration> {
        while let Some(&oldest) = self.history.front() {
            if now.duration_since(oldest) >= self.window {
                self.history.pop_front();
            } else {
                break;
            }
        }

        if self.history.len() < self.max_requests {
            return None;
        }

        let oldest = *self.history.front()?;
        Some(self.window - now.duration_since(oldest))
    }

    /// Занять слот, дождавшись освобождения окна при необходимости
    pub async fn acquire(&mut self) {
        if let Some(delay) = self.next_delay(Instant::now()) {
            tokio::time::sleep(delay).await;
            // После sleep окно гарантированно освободилось
            self.next_delay(Instant::now());
        }
        self.history.push_back(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_limit_no_delay() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(1));
        let now = Instant::now();
        assert!(limiter.next_delay(now).is_none());
        limiter.history.push_back(now);
        limiter.history.push_back(now);
        assert!(limiter.next_delay(now).is_none());
    }

    #[test]
    fn full_window_requires_wait() {
        let mut limiter = RateLimiter::new(2, Duration::from_millis(1000));
        let start = Instant::now();
        limiter.history.push_back(start);
        limiter.history.push_back(start);

        let delay = limiter
            .next_delay(start + Duration::from_millis(300))
            .expect("window is full");
        assert_eq!(delay, Duration::from_millis(700));
    }

    #[test]
    fn expired_entries_free_the_window() {
        let mut limiter = RateLimiter::new(2, Duration::from_millis(1000));
        let start = Instant::now();
        limiter.history.push_back(start);
        limiter.history.push_back(start);

        // Через полторы секунды обе записи устарели
        assert!(limiter
            .next_delay(start + Duration::from_millis(1500))
            .is_none());
        assert!(limiter.history.is_empty());
    }

    #[tokio::test]
    async fn acquire_records_slot() {
        let mut limiter = RateLimiter::new(100, Duration::from_millis(100));
        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(limiter.history.len(), 2);
    }
}
