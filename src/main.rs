fn main() {
    flashclick_lib::run()
}
