/// How far through the question bank the interview is.
///
/// Counts real questions asked, independent of the time-based estimate in
/// `StatusSnapshot::questions_remaining`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterviewProgress {
    pub total: usize,
    pub asked: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
