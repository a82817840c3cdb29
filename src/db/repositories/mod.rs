mod assignment_repository;
mod attendance_repository;
mod booking_repository;
mod member_repository;
mod otp_repository;
mod rating_repository;
mod report_repository;
mod staff_repository;
mod time_slot_repository;

pub use assignment_repository::AssignmentRepository;
pub use attendance_repository::AttendanceRepository;
pub use booking_repository::BookingRepository;
pub use member_repository::MemberRepository;
pub use otp_repository::OtpRepository;
pub use rating_repository::RatingRepository;
pub use report_repository::{
    DuesDimension, DuesFilters, DuesStatus, ReportRepository,
};
pub use staff_repository::StaffRepository;
pub use time_slot_repository::TimeSlotRepository;
